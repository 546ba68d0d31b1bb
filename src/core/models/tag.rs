use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// Trims, lowercases and deduplicates tag names, keeping first-seen order.
pub fn normalize(names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        let name = name.trim().to_lowercase();
        if !name.is_empty() && !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize() {
        let names = vec![" Calculus ".into(), "calculus".into(), "".into(), "Limits".into()];
        assert_eq!(normalize(names), vec!["calculus".to_owned(), "limits".to_owned()]);
    }
}
