// src/suggestions.rs

/// Quick-reply chips shown under the timeline.
pub const SUGGESTIONS: [&str; 5] = [
    "Software Engineer jobs",
    "Remote Data Science positions",
    "Entry level UX Designer",
    "Tech internships for women",
    "Jobs at women-friendly companies",
];

/// Lines of the search-tips panel.
pub const SEARCH_TIPS: [&str; 4] = [
    "Include location for local jobs: \"Software jobs in Boston\"",
    "Specify experience level: \"Entry level data analyst\"",
    "Add \"women-friendly\" to prioritize inclusive workplaces",
    "Mention specific technologies: \"React developer positions\"",
];

/// The tips panel stays up until the first successful search.
pub fn tips_visible(has_searched: bool) -> bool {
    !has_searched
}
