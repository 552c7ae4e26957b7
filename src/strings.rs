//! Small string helpers shared by the processor and the template filters.

/// Strip the scheme, a leading `www.` and trailing slashes from a URL so it
/// reads well as link text.
pub fn clean_url(url: &str) -> String {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

/// Normalise a section title into the key used by configuration lists,
/// e.g. `"Work Experience"` → `"work_experience"`.
pub fn snake_case(title: &str) -> String {
    slug::slugify(title).replace('-', "_")
}

/// Underscore-joined file stem for a person's documents, e.g. `John_Doe_CV`.
pub fn document_stem(name: Option<&str>) -> String {
    let name = name
        .map(|n| n.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Your_Name".to_string());
    format!("{name}_CV")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_url_strips_scheme_and_slash() {
        assert_eq!(clean_url("https://www.example.com/"), "example.com");
        assert_eq!(clean_url("http://example.com/a/b//"), "example.com/a/b");
        assert_eq!(clean_url("example.com"), "example.com");
    }

    #[test]
    fn snake_case_titles() {
        assert_eq!(snake_case("Experience"), "experience");
        assert_eq!(snake_case("Work Experience"), "work_experience");
        assert_eq!(snake_case("Skills & Tools"), "skills_tools");
    }

    #[test]
    fn stem_from_name() {
        assert_eq!(document_stem(Some("John  Doe")), "John_Doe_CV");
        assert_eq!(document_stem(None), "Your_Name_CV");
    }
}
