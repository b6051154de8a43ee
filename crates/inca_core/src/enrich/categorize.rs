use crate::config::CategoryRule;

/// Category assigned when no configured rule matches.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Assign a pattern category from ordered keyword rules.
///
/// The search text is the lowercased concatenation of short and long description. Rules
/// are scanned in configured order and the first rule with any keyword hit wins, so ties
/// are broken by rule order, a documented product decision, not hidden behavior.
pub fn categorize(rules: &[CategoryRule], short_description: &str, description: &str) -> String {
    let text = format!("{short_description} {description}").to_lowercase();

    for rule in rules {
        if rule
            .keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()))
        {
            return rule.name.clone();
        }
    }

    FALLBACK_CATEGORY.to_string()
}
