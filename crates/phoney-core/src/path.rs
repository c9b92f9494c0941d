use std::fmt;

/// Label used for issues raised against the template root.
pub const ROOT_LABEL: &str = "template";

/// Location of a value inside a template, in dot/bracket notation.
///
/// Keys are joined with `.` and sequence positions are rendered as `[i]`,
/// so the email of the first contact of a user renders as
/// `user.contacts[0].email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    rendered: String,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of a mapping value below this path.
    pub fn key(&self, key: &str) -> Self {
        let rendered = if self.rendered.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.rendered)
        };
        Self { rendered }
    }

    /// Path of a sequence element below this path.
    pub fn index(&self, index: usize) -> Self {
        Self {
            rendered: format!("{}[{index}]", self.rendered),
        }
    }

    pub fn is_root(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rendered.is_empty() {
            f.write_str(ROOT_LABEL)
        } else {
            f.write_str(&self.rendered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_keys_and_indexes() {
        let path = FieldPath::root()
            .key("user")
            .key("contacts")
            .index(0)
            .key("email");
        assert_eq!(path.as_str(), "user.contacts[0].email");
        assert_eq!(path.to_string(), "user.contacts[0].email");
    }

    #[test]
    fn root_displays_label() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), ROOT_LABEL);
        assert_eq!(root.index(2).as_str(), "[2]");
    }
}
