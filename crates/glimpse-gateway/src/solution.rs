use std::sync::OnceLock;

use glimpse_core::Solution;
use regex::Regex;
use serde_json::Value;

/// Distinguishes the two operation flavors, which share a request shape but
/// differ in prompts and fallback wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionMode {
    Generate,
    Debug,
}

impl SolutionMode {
    pub(crate) fn system_prompt(&self) -> &'static str {
        match self {
            SolutionMode::Generate => {
                "You are a skilled programming assistant. Provide solutions in valid JSON format."
            }
            SolutionMode::Debug => {
                "You are a skilled programming assistant. Provide debug solutions in valid JSON format."
            }
        }
    }

    pub(crate) fn user_prompt(&self, problem_text: &str, language: &str) -> String {
        match self {
            SolutionMode::Generate => format!(
                "Solve the following problem in {language}:\n{problem_text}\n\
                 Provide your solution in the following JSON format:\n\
                 {{\n\
                 \"code\": \"your complete code solution here\",\n\
                 \"thoughts\": [\"thought 1\", \"thought 2\", \"thought 3\"],\n\
                 \"time_complexity\": \"explanation here\",\n\
                 \"space_complexity\": \"explanation here\"\n\
                 }}"
            ),
            SolutionMode::Debug => format!(
                "Debug the following problem in {language}:\n{problem_text}\n\
                 Provide your debug solution in the following JSON format:\n\
                 {{\n\
                 \"code\": \"your complete fixed code solution here\",\n\
                 \"thoughts\": [\"debug observation 1\", \"debug observation 2\", \"debug observation 3\"],\n\
                 \"time_complexity\": \"O(n) explanation here\",\n\
                 \"space_complexity\": \"O(n) explanation here\"\n\
                 }}"
            ),
        }
    }

    fn missing_thoughts(&self) -> &'static str {
        match self {
            SolutionMode::Generate => "No specific thoughts provided",
            SolutionMode::Debug => "No specific debug observations provided",
        }
    }

    fn recovered_thoughts(&self) -> &'static str {
        match self {
            SolutionMode::Generate => "Automatically extracted from unstructured response",
            SolutionMode::Debug => "Automatically extracted from unstructured debug response",
        }
    }
}

/// Outcome of decoding a model completion into a [`Solution`].
///
/// `Structured` means the completion was valid JSON and fields were taken
/// verbatim (missing fields substituted per-field). `Recovered` means the
/// completion was not JSON and the code was salvaged from the raw text.
/// Decoding never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSolution {
    Structured(Solution),
    Recovered(Solution),
}

impl ParsedSolution {
    pub fn solution(&self) -> &Solution {
        match self {
            ParsedSolution::Structured(s) | ParsedSolution::Recovered(s) => s,
        }
    }

    pub fn into_solution(self) -> Solution {
        match self {
            ParsedSolution::Structured(s) | ParsedSolution::Recovered(s) => s,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedSolution::Structured(_))
    }
}

pub(crate) fn decode(raw: &str, mode: SolutionMode) -> ParsedSolution {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => ParsedSolution::Structured(from_json(&value, mode)),
        Err(error) => {
            tracing::warn!(%error, "model response was not valid JSON, recovering code from raw text");
            ParsedSolution::Recovered(recover(raw, mode))
        }
    }
}

fn from_json(value: &Value, mode: SolutionMode) -> Solution {
    let thoughts = match value["thoughts"].as_array() {
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => vec![mode.missing_thoughts().to_string()],
    };

    Solution {
        code: value["code"].as_str().unwrap_or("").to_string(),
        thoughts,
        time_complexity: value["time_complexity"]
            .as_str()
            .unwrap_or("Not specified")
            .to_string(),
        space_complexity: value["space_complexity"]
            .as_str()
            .unwrap_or("Not specified")
            .to_string(),
    }
}

fn recover(raw: &str, mode: SolutionMode) -> Solution {
    let defenced = strip_code_fences(raw);
    let code = if defenced.is_empty() { raw } else { &defenced };

    Solution {
        code: code.to_string(),
        thoughts: vec![mode.recovered_thoughts().to_string()],
        time_complexity: "Could not determine from response".to_string(),
        space_complexity: "Could not determine from response".to_string(),
    }
}

fn strip_code_fences(raw: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"(?s)```\w*\n(.*?)```").expect("valid regex"));
    fence.replace_all(raw, "$1").trim().to_string()
}
