// src/render.rs
//
// Turns assistant content and job records into a typed render tree the UI
// can paint. No string-substitution markup and no side effects; rendering
// the same message twice yields structurally identical output.

use crate::chat::ChatMessage;
use crate::models::JobRecord;

/// Line-start marker opening the job card section of a search reply.
pub const JOBS_SECTION_MARKER: &str = "## Job Recommendations";

/// Trailing marker closing a search reply; the epilogue is the text that
/// follows it.
pub const REFINE_MARKER: &str = "Would you like more specific results?";

/// Full refine prompt appended to composed replies, and the default
/// epilogue when the marker is missing from the content.
pub const REFINE_PROMPT: &str = "Would you like more specific results? You can refine your search with location, job type, or specific skills.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Text(String),
    Bold(String),
    Link { label: String, url: String },
    Heading(String),
    LineBreak,
}

/// One job posting as a display-ready card. Optional badges are omitted
/// when the source field is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub posting_date: Option<String>,
    pub salary_range: Option<String>,
    pub women_friendly: bool,
    pub skills: Vec<String>,
    pub apply_url: String,
}

impl From<&JobRecord> for JobCard {
    fn from(job: &JobRecord) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            posting_date: job.posting_date.clone(),
            salary_range: job.salary_range.clone(),
            women_friendly: job.is_women_friendly.unwrap_or(false),
            skills: job.skills.clone().unwrap_or_default(),
            apply_url: job.application_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTree {
    pub preamble: Vec<RenderNode>,
    pub cards: Vec<JobCard>,
    pub epilogue: Vec<RenderNode>,
}

/// Renders a chat message into its display tree. Messages without jobs are
/// just their content with inline markup resolved; messages with jobs get
/// the content split around the job card section.
pub fn render(message: &ChatMessage) -> RenderTree {
    if message.jobs.is_empty() {
        return RenderTree {
            preamble: parse_inline(&message.content),
            cards: Vec::new(),
            epilogue: Vec::new(),
        };
    }

    let (preamble_text, epilogue_text) = split_sections(&message.content);

    RenderTree {
        preamble: parse_inline(preamble_text.trim()),
        cards: message.jobs.iter().map(JobCard::from).collect(),
        epilogue: parse_inline(epilogue_text.trim()),
    }
}

/// Splits search-reply content into the text before the job section and the
/// text after the trailing refine marker. A missing marker falls back to
/// the canned prompt.
fn split_sections(content: &str) -> (&str, &str) {
    let preamble = match content.find(JOBS_SECTION_MARKER) {
        Some(idx) => &content[..idx],
        None => content,
    };

    let epilogue = match content.find(REFINE_MARKER) {
        Some(idx) => &content[idx + REFINE_MARKER.len()..],
        None => REFINE_PROMPT,
    };

    (preamble, epilogue)
}

/// Parses inline markup into render nodes. Recognized constructs: bold
/// (`**text**`), links (`[label](url)`), line-leading headings (`## text`)
/// and line breaks. Unterminated markers degrade to plain text.
pub fn parse_inline(content: &str) -> Vec<RenderNode> {
    let mut nodes = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if idx > 0 {
            nodes.push(RenderNode::LineBreak);
        }

        if let Some(heading) = line.strip_prefix("## ") {
            nodes.push(RenderNode::Heading(heading.to_string()));
            continue;
        }

        parse_line(line, &mut nodes);
    }

    nodes
}

fn parse_line(line: &str, nodes: &mut Vec<RenderNode>) {
    let mut rest = line;
    let mut text = String::new();

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix("**") {
            if let Some(end) = stripped.find("**") {
                flush_text(&mut text, nodes);
                nodes.push(RenderNode::Bold(stripped[..end].to_string()));
                rest = &stripped[end + 2..];
                continue;
            }
        }

        if rest.starts_with('[') {
            if let Some((label, url, consumed)) = parse_link(rest) {
                flush_text(&mut text, nodes);
                nodes.push(RenderNode::Link { label, url });
                rest = &rest[consumed..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            text.push(c);
            rest = chars.as_str();
        }
    }

    flush_text(&mut text, nodes);
}

fn flush_text(text: &mut String, nodes: &mut Vec<RenderNode>) {
    if !text.is_empty() {
        nodes.push(RenderNode::Text(std::mem::take(text)));
    }
}

/// Tries to read a `[label](url)` construct from the start of `input`.
/// Returns the label, the url and how many bytes were consumed.
fn parse_link(input: &str) -> Option<(String, String, usize)> {
    let close_bracket = input.find(']')?;
    let after_label = &input[close_bracket + 1..];
    if !after_label.starts_with('(') {
        return None;
    }
    let close_paren = after_label.find(')')?;

    let label = input[1..close_bracket].to_string();
    let url = after_label[1..close_paren].to_string();
    let consumed = close_bracket + 1 + close_paren + 1;
    Some((label, url, consumed))
}
