//! Static documentation sections served by the dashboard.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DocSection {
    pub slug: &'static str,
    pub title: &'static str,
    pub content: &'static str,
}

pub static DOC_SECTIONS: &[DocSection] = &[
    DocSection {
        slug: "overview",
        title: "Platform Overview",
        content: include_str!("../docs/overview.md"),
    },
    DocSection {
        slug: "voice",
        title: "Voice Recognition Guide",
        content: include_str!("../docs/voice.md"),
    },
    DocSection {
        slug: "api",
        title: "API Integration",
        content: include_str!("../docs/api.md"),
    },
    DocSection {
        slug: "modules",
        title: "Module Management",
        content: include_str!("../docs/modules.md"),
    },
    DocSection {
        slug: "android",
        title: "Android Support",
        content: include_str!("../docs/android.md"),
    },
];

pub fn find_section(slug: &str) -> Option<&'static DocSection> {
    DOC_SECTIONS.iter().find(|s| s.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_slug() {
        let section = find_section("voice").unwrap();
        assert_eq!(section.title, "Voice Recognition Guide");
        assert!(section.content.starts_with("# Voice Recognition"));
        assert!(find_section("missing").is_none());
    }

    #[test]
    fn test_every_section_has_content() {
        assert_eq!(DOC_SECTIONS.len(), 5);
        for section in DOC_SECTIONS {
            assert!(section.content.trim_start().starts_with('#'), "{}", section.slug);
        }
    }
}
