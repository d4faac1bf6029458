use fancy_regex::{Captures, Regex};
use ndns_domain::{AuthorizationRule, ConfigError, Name, TrustAnchor};
use tracing::trace;

/// Authorization rule with its patterns compiled
struct CompiledRule {
    key_pattern: Regex,
    key_template: String,
    data_pattern: Regex,
    data_template: String,
}

impl CompiledRule {
    fn compile(rule: &AuthorizationRule) -> Result<Self, ConfigError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ConfigError::Validation(format!("invalid rule pattern [{}]: {}", pattern, e))
            })
        };

        Ok(Self {
            key_pattern: compile(&rule.key_pattern)?,
            key_template: rule.key_template.clone(),
            data_pattern: compile(&rule.data_pattern)?,
            data_template: rule.data_template.clone(),
        })
    }

    fn authorizes(&self, data_name: &Name, key_name: &Name) -> bool {
        let Some(key_namespace) = derive(&self.key_pattern, &self.key_template, key_name) else {
            return false;
        };
        let Some(data_namespace) = derive(&self.data_pattern, &self.data_template, data_name)
        else {
            return false;
        };

        key_namespace.is_prefix_of(&data_namespace)
    }
}

/// Namespace derived from `name` by a pattern and template, `None` when the
/// pattern does not match
fn derive(pattern: &Regex, template: &str, name: &Name) -> Option<Name> {
    let uri = name.to_string();
    let captures = pattern.captures(&uri).ok().flatten()?;
    let expanded = expand(template, &captures);

    if expanded.is_empty() || expanded == "/" {
        return Some(Name::root());
    }
    Name::parse(&expanded).ok()
}

/// Substitute `\N` back-references in `template`
fn expand(template: &str, captures: &Captures<'_>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut group = String::new();
        while let Some(digit) = chars.peek().filter(|d| d.is_ascii_digit()) {
            group.push(*digit);
            chars.next();
        }

        match group.parse::<usize>() {
            Ok(index) => {
                if let Some(matched) = captures.get(index) {
                    out.push_str(matched.as_str());
                }
            }
            Err(_) => out.push(c),
        }
    }

    out
}

/// Ordered trust anchors and authorization rules
///
/// Both lists are scanned front to back; the first anchor that matches
/// decides.
pub struct TrustPolicy {
    anchors: Vec<TrustAnchor>,
    rules: Vec<CompiledRule>,
}

impl TrustPolicy {
    pub fn new(
        anchors: Vec<TrustAnchor>,
        rules: &[AuthorizationRule],
    ) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { anchors, rules })
    }

    pub fn has_anchors(&self) -> bool {
        !self.anchors.is_empty()
    }

    pub fn anchors(&self) -> &[TrustAnchor] {
        &self.anchors
    }

    /// First anchor whose key name is `key_name` and whose namespace covers
    /// `data_name`
    pub fn anchor_for(&self, data_name: &Name, key_name: &Name) -> Option<&TrustAnchor> {
        self.anchors
            .iter()
            .find(|anchor| anchor.authorizes(data_name, key_name))
    }

    /// Whether some rule lets `key_name` sign `data_name`
    pub fn rule_authorizes(&self, data_name: &Name, key_name: &Name) -> bool {
        let authorized = self
            .rules
            .iter()
            .any(|rule| rule.authorizes(data_name, key_name));

        trace!(
            data = %data_name,
            key = %key_name,
            authorized = authorized,
            "Authorization rule check"
        );

        authorized
    }
}
