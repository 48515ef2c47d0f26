use chrono::{DateTime, Local};

pub struct OutputGenerator;

impl OutputGenerator {
    pub const TITLE: &'static str = "# Project Structure";

    /// Wraps the rendered tree in a fenced block under a title, followed by
    /// the generation time.
    pub fn format_document(root_name: &str, tree: &str, generated_at: &DateTime<Local>) -> String {
        let mut out = String::from(Self::TITLE);
        out.push_str("\n\n```\n");
        out.push_str(root_name.trim_end_matches(['/', '\\']));
        out.push_str("/\n");
        out.push_str(tree);
        if !tree.is_empty() && !tree.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n");
        out.push_str(&format!("*Generated on {}*\n", Self::format_timestamp(generated_at)));
        out
    }

    /// `MM/DD/YYYY HH:MM`, 24-hour clock.
    pub fn format_timestamp(generated_at: &DateTime<Local>) -> String {
        generated_at.format("%m/%d/%Y %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 18, 5, 0).single().unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(OutputGenerator::format_timestamp(&fixed_time()), "03/07/2024 18:05");
    }

    #[test]
    fn test_document_layout() {
        let tree = "├── sub/\n│   └── b.txt\n├── a.txt\n└── z.txt\n";
        let doc = OutputGenerator::format_document("proj", tree, &fixed_time());
        assert_eq!(
            doc,
            "# Project Structure\n\n```\nproj/\n├── sub/\n│   └── b.txt\n├── a.txt\n└── z.txt\n```\n\n*Generated on 03/07/2024 18:05*\n"
        );
    }

    #[test]
    fn test_filesystem_root_gets_single_separator() {
        let doc = OutputGenerator::format_document("/", "└── etc/\n", &fixed_time());
        assert!(doc.contains("```\n/\n└── etc/\n```"));
        assert!(!doc.contains("//"));
    }

    #[test]
    fn test_empty_tree_still_closes_fence() {
        let doc = OutputGenerator::format_document("empty", "", &fixed_time());
        assert!(doc.starts_with("# Project Structure\n\n```\nempty/\n```\n\n"));
    }
}
