use super::TurnReport;

pub const NO_ANSWER: &str = "No suitable answer found.";

/// Text printed for one turn. `show_steps` adds the detected language and the
/// English question ahead of the answers, and each English answer ahead of its
/// translation.
pub fn render_turn(report: &TurnReport, show_steps: bool) -> String {
    let mut output = String::new();

    if show_steps {
        if let Some(language) = report.language() {
            output.push_str(&format!("Detected language: {language}\n"));
        }
        if report.was_translated() {
            output.push_str(&format!(
                "Translated to English: {}\n",
                sanitize_line(&report.english_question)
            ));
        }
    }

    if report.answers.is_empty() {
        output.push_str(NO_ANSWER);
        output.push('\n');
        return output;
    }

    for answer in &report.answers {
        if show_steps && report.was_translated() {
            output.push_str(&format!(
                "Bot (English): {} (Confidence: {})\n",
                answer.candidate.answer, answer.candidate.confidence
            ));
        }
        output.push_str(&format!("[Answer]: {}\n", answer.text));
        output.push_str(&format!("Confidence: {}\n", answer.candidate.confidence));
        output.push_str(&format!("Source: {}\n", answer.candidate.source));
        if let Some(reason) = &answer.translation_error {
            let language = report
                .language()
                .map(|l| l.as_str())
                .unwrap_or("the question's language");
            output.push_str(&format!(
                "(shown in English: translation to {language} failed: {reason})\n"
            ));
        }
    }

    output
}

/// Keep echoed input on one line.
fn sanitize_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{PresentedAnswer, Utterance};
    use crate::lang::LanguageCode;
    use crate::qa::AnswerCandidate;

    fn report(lang: &str, answers: Vec<PresentedAnswer>) -> TurnReport {
        TurnReport {
            question: Utterance::new("¿Cuál es el horario?")
                .in_language(LanguageCode::parse(lang).unwrap()),
            english_question: "What is the schedule?".into(),
            answers,
        }
    }

    fn presented(text: &str, error: Option<&str>) -> PresentedAnswer {
        PresentedAnswer {
            candidate: AnswerCandidate {
                answer: "9 to 5".into(),
                confidence: 0.87,
                source: "faq.pdf".into(),
            },
            text: text.into(),
            translation_error: error.map(str::to_string),
        }
    }

    #[test]
    fn renders_answer_confidence_and_source() {
        let text = render_turn(&report("es", vec![presented("9 a 5", None)]), false);
        assert_eq!(text, "[Answer]: 9 a 5\nConfidence: 0.87\nSource: faq.pdf\n");
    }

    #[test]
    fn empty_answers_render_single_no_answer_line() {
        let text = render_turn(&report("es", vec![]), false);
        assert_eq!(text, "No suitable answer found.\n");
    }

    #[test]
    fn steps_show_language_and_english_question() {
        let text = render_turn(&report("es", vec![presented("9 a 5", None)]), true);
        assert!(text.starts_with(
            "Detected language: es\nTranslated to English: What is the schedule?\n"
        ));
    }

    #[test]
    fn steps_show_english_answer_before_translation() {
        let text = render_turn(&report("es", vec![presented("9 a 5", None)]), true);
        assert!(text.ends_with(
            "Bot (English): 9 to 5 (Confidence: 0.87)\n[Answer]: 9 a 5\nConfidence: 0.87\nSource: faq.pdf\n"
        ));

        let english = render_turn(&report("en", vec![presented("9 to 5", None)]), true);
        assert!(!english.contains("Bot (English)"));
    }

    #[test]
    fn steps_skip_translation_line_for_english() {
        let text = render_turn(&report("en", vec![]), true);
        assert!(text.contains("Detected language: en"));
        assert!(!text.contains("Translated to English"));
    }

    #[test]
    fn failed_translation_is_noted() {
        let text = render_turn(
            &report("es", vec![presented("9 to 5", Some("API error (500): boom"))]),
            false,
        );
        assert!(text.contains("[Answer]: 9 to 5"));
        assert!(text.contains("translation to es failed: API error (500): boom"));
    }

    #[test]
    fn sanitize_line_replaces_newlines() {
        assert_eq!(sanitize_line("a\nb\rc"), "a b c");
    }
}
