//! Command registry: read-mostly snapshot mapping every recognized name
//! variant to its descriptor, with a longest-prefix path for invocations
//! where the argument is glued to the name (`/weathermoscow` style).

use std::collections::HashMap;
use std::sync::Arc;

use cbot_core::CommandDescriptor;

/// Outcome of a registry lookup: the matched descriptor plus the remaining
/// argument text.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub descriptor: Arc<CommandDescriptor>,
    pub args: String,
}

/// Built once at startup from the loaded descriptors; O(1) lookup per name
/// variant, case-insensitive. Refreshing means building a new registry and
/// swapping the `Arc`.
pub struct CommandRegistry {
    by_name: HashMap<String, Arc<CommandDescriptor>>,
    /// Registration order, used for prefix-match tie breaking.
    order: Vec<Arc<CommandDescriptor>>,
}

impl CommandRegistry {
    pub fn new(descriptors: Vec<CommandDescriptor>) -> Self {
        let mut by_name = HashMap::new();
        let mut order = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let descriptor = Arc::new(descriptor);
            for name in descriptor.all_names() {
                // First registration of a variant wins.
                by_name
                    .entry(name.to_lowercase())
                    .or_insert_with(|| descriptor.clone());
            }
            order.push(descriptor);
        }
        Self { by_name, order }
    }

    /// Looks up a descriptor by canonical name (used when a waiting state
    /// names the command that owns the continuation).
    pub fn get(&self, name: &str) -> Option<Arc<CommandDescriptor>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Name variants of the administration command; aliases may never
    /// shadow these.
    pub fn settings_names(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|d| d.settings)
            .flat_map(|d| d.all_names().map(str::to_lowercase).collect::<Vec<_>>())
            .collect()
    }

    /// Resolves free text to a command.
    ///
    /// The first token (leading `/` and `@mention` suffix stripped, matched
    /// case-insensitively) is tried exactly first. Failing that, the longest
    /// recognized name that is a proper prefix of the token wins; ties go to
    /// the earlier registration. The rest of the token and any remaining
    /// words become `args`.
    pub fn resolve(&self, text: &str) -> Option<Resolved> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (trimmed, ""),
        };
        let token = normalize_token(first);
        if token.is_empty() {
            return None;
        }

        if let Some(descriptor) = self.by_name.get(&token) {
            return Some(Resolved {
                descriptor: descriptor.clone(),
                args: rest.to_string(),
            });
        }

        // Longest-recognized-prefix match; longer wins, then registration
        // order.
        let mut best: Option<(usize, &Arc<CommandDescriptor>)> = None;
        for descriptor in &self.order {
            for name in descriptor.all_names() {
                let name = name.to_lowercase();
                if name.len() < token.len() && token.starts_with(&name) {
                    let better = match best {
                        Some((len, _)) => name.len() > len,
                        None => true,
                    };
                    if better {
                        best = Some((name.len(), descriptor));
                    }
                }
            }
        }
        best.map(|(len, descriptor)| {
            let glued = &token[len..];
            let args = if rest.is_empty() {
                glued.to_string()
            } else {
                format!("{} {}", glued, rest)
            };
            Resolved {
                descriptor: descriptor.clone(),
                args,
            }
        })
    }
}

/// Strips the leading slash and a trailing `@botname` mention, lowercases.
fn normalize_token(token: &str) -> String {
    let token = token.strip_prefix('/').unwrap_or(token);
    let token = token.split('@').next().unwrap_or(token);
    token.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbot_core::AccessLevel;

    fn registry() -> CommandRegistry {
        CommandRegistry::new(vec![
            CommandDescriptor::new("set", "set", AccessLevel::Moderator)
                .with_localized("настройка")
                .as_settings(),
            CommandDescriptor::new("weather", "weather", AccessLevel::Newcomer)
                .with_localized("погода"),
            CommandDescriptor::new("weatherweek", "weatherweek", AccessLevel::Newcomer),
        ])
    }

    #[test]
    fn test_exact_match_with_args() {
        let resolved = registry().resolve("weather Paris").unwrap();
        assert_eq!(resolved.descriptor.name, "weather");
        assert_eq!(resolved.args, "Paris");
    }

    #[test]
    fn test_slash_and_mention_stripped() {
        let resolved = registry().resolve("/Weather@somebot Paris").unwrap();
        assert_eq!(resolved.descriptor.name, "weather");
        assert_eq!(resolved.args, "Paris");
    }

    #[test]
    fn test_localized_name_recognized() {
        let resolved = registry().resolve("погода").unwrap();
        assert_eq!(resolved.descriptor.name, "weather");
        assert_eq!(resolved.args, "");
    }

    #[test]
    fn test_prefix_match_extracts_glued_argument() {
        let resolved = registry().resolve("/weathermoscow now").unwrap();
        assert_eq!(resolved.descriptor.name, "weather");
        assert_eq!(resolved.args, "moscow now");
    }

    #[test]
    fn test_prefix_tie_longer_name_wins() {
        // Both "weather" and "weatherweek" are prefixes; the longer wins.
        let resolved = registry().resolve("weatherweekmoscow").unwrap();
        assert_eq!(resolved.descriptor.name, "weatherweek");
        assert_eq!(resolved.args, "moscow");
    }

    #[test]
    fn test_unknown_text_resolves_to_nothing() {
        assert!(registry().resolve("citycityname Paris").is_none());
        assert!(registry().resolve("").is_none());
        assert!(registry().resolve("   ").is_none());
    }

    #[test]
    fn test_settings_names_collects_variants() {
        let names = registry().settings_names();
        assert!(names.contains(&"set".to_string()));
        assert!(names.contains(&"настройка".to_string()));
    }

    #[test]
    fn test_get_by_canonical_name() {
        assert!(registry().get("WEATHER").is_some());
        assert!(registry().get("nope").is_none());
    }
}
