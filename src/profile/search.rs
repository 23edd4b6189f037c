/// A non-empty substring to look for in nickname and login.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// An absent or empty term means "no filter".
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw {
            Some(term) if !term.is_empty() => Some(Self(term.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ILIKE` pattern matching the term anywhere, with LIKE metacharacters escaped.
    pub fn contains_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for c in self.0.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
