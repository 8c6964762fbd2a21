//! Line-driven questionnaire session over any reader and writer.

use std::io::{BufRead, Write};

use client_core::{
    api::{AnswerSink, QuestionSource},
    images::question_image,
    FlowError, FlowState, QuestionnaireController,
};

use crate::render::Styler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// 1-based option number.
    Select(usize),
    Next,
    Back,
    Submit,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if let Ok(number) = line.parse::<usize>() {
        return Input::Select(number);
    }
    match line.to_ascii_lowercase().as_str() {
        "n" | "next" => Input::Next,
        "b" | "back" => Input::Back,
        "s" | "submit" => Input::Submit,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted,
    Quit,
    Unavailable,
}

impl Outcome {
    /// Only an unreachable or empty questionnaire ends the process with an error.
    pub fn is_failure(self) -> bool {
        self == Self::Unavailable
    }
}

pub async fn run_session<S>(
    controller: &mut QuestionnaireController,
    api: &S,
    styler: &Styler,
    mut input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Outcome>
where
    S: QuestionSource + AnswerSink,
{
    writeln!(out, "{}", styler.muted("Loading questions..."))?;
    match controller.load(api).await {
        Ok(()) => {}
        Err(FlowError::LoadFailed(reason)) => {
            writeln!(out, "{}", styler.danger(&format!("Could not load questions: {reason}")))?;
            return Ok(Outcome::Unavailable);
        }
        Err(other) => return Err(other.into()),
    }
    if controller.state() == &FlowState::NoQuestions {
        writeln!(out, "No questions available.")?;
        return Ok(Outcome::Unavailable);
    }

    let mut line = String::new();
    loop {
        render_question(controller, styler, out)?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(Outcome::Quit);
        }

        match parse_input(&line) {
            Input::Select(number) => select(controller, number, styler, out)?,
            Input::Next if !controller.is_at_last_question() => {
                controller.advance()?;
            }
            Input::Next | Input::Submit => {
                if submit(controller, api, styler, out).await? {
                    return Ok(Outcome::Submitted);
                }
            }
            Input::Back => {
                if !controller.retreat()? {
                    writeln!(out, "{}", styler.muted("Already at the first question."))?;
                }
            }
            Input::Quit => return Ok(Outcome::Quit),
            Input::Unknown(raw) => {
                writeln!(out, "{}", styler.danger(&format!("Unrecognized input '{raw}'.")))?;
            }
        }
    }
}

fn render_question(
    controller: &QuestionnaireController,
    styler: &Styler,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (Some(group), Some(question)) =
        (controller.current_group_name(), controller.current_question())
    else {
        return Ok(());
    };
    let (answered, total) = controller.progress();

    writeln!(out)?;
    writeln!(
        out,
        "{} {}",
        styler.heading(group),
        styler.muted(&format!("{answered}/{total} answered"))
    )?;
    writeln!(out, "{}", styler.muted(question_image(question).asset_path()))?;
    writeln!(out, "{}", question.question)?;

    let selected = controller.selected_option(&question.id);
    for (index, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(option.as_str()) { "*" } else { " " };
        let label = format!("{marker} {}. {option}", index + 1);
        if marker == "*" {
            writeln!(out, "{}", styler.accent(&label))?;
        } else {
            writeln!(out, "{label}")?;
        }
    }

    let mut hints = Vec::with_capacity(3);
    if !controller.is_at_first_question() {
        hints.push("b back");
    }
    hints.push(if controller.is_at_last_question() {
        "s submit"
    } else {
        "n next"
    });
    hints.push("q quit");
    writeln!(out, "{}", styler.muted(&hints.join(" | ")))?;
    out.flush()?;
    Ok(())
}

fn select(
    controller: &mut QuestionnaireController,
    number: usize,
    styler: &Styler,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some((question_id, option)) = controller.current_question().and_then(|question| {
        let option = question.options.get(number.checked_sub(1)?)?;
        Some((question.id.clone(), option.clone()))
    }) else {
        writeln!(out, "{}", styler.danger(&format!("There is no option {number}.")))?;
        return Ok(());
    };
    controller.select_option(&question_id, &option)?;
    Ok(())
}

/// Returns `true` once the answers were accepted.
async fn submit(
    controller: &mut QuestionnaireController,
    sink: &dyn AnswerSink,
    styler: &Styler,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    writeln!(out, "{}", styler.muted("Submitting..."))?;
    match controller.submit(sink).await {
        Ok(()) => {
            writeln!(out, "{}", styler.success("Thank you! Your responses were saved."))?;
            Ok(true)
        }
        Err(FlowError::Validation { missing }) => {
            let ids: Vec<&str> = missing.iter().map(|id| id.as_str()).collect();
            writeln!(
                out,
                "{}",
                styler.danger(&format!(
                    "Please answer all questions before submitting. Missing: {}",
                    ids.join(", ")
                ))
            )?;
            Ok(false)
        }
        Err(FlowError::Submission(reason)) => {
            writeln!(
                out,
                "{}",
                styler.danger(&format!(
                    "Could not submit: {reason}. Your answers are kept; press s to retry."
                ))
            )?;
            Ok(false)
        }
        Err(other) => Err(other.into()),
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
