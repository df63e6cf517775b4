use std::sync::Arc;

use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use secrecy::ExposeSecret;
use serde::Deserialize;

use crate::{
    auth::Claims,
    config::Config,
    constants::prompts::QUIZ_GENERATION_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::{Answer, Question, Quiz},
        dto::{request::GenerateQuestionsRequest, response::GenerationReport},
    },
    repositories::QuizRepository,
    services::source_service::SourceService,
};

const ANSWERS_PER_QUESTION: usize = 4;

/// Shape of one generated question as the model is asked to emit it.
/// Missing or malformed pieces are tolerated and repaired downstream.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    answers: Vec<RawAnswer>,
}

#[derive(Debug, Deserialize)]
struct RawAnswer {
    text: String,
    #[serde(default)]
    is_correct: bool,
}

pub struct GenerationService {
    client: Client<OpenAIConfig>,
    model: String,
    quizzes: Arc<dyn QuizRepository>,
    sources: SourceService,
}

impl GenerationService {
    pub fn new(config: &Config, quizzes: Arc<dyn QuizRepository>, sources: SourceService) -> Self {
        let openai_config =
            OpenAIConfig::new().with_api_key(config.openai_api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            model: config.generation_model.clone(),
            quizzes,
            sources,
        }
    }

    /// Generates a quiz from source material and persists it. The returned
    /// report carries any repairs the normalizer had to make; a degraded
    /// quiz is stored anyway so the author can fix it by hand.
    pub async fn generate_quiz(
        &self,
        request: GenerateQuestionsRequest,
        author: &Claims,
    ) -> AppResult<GenerationReport> {
        let material = self
            .sources
            .prepare(request.source_kind, &request.source)
            .await?;

        let raw = self
            .complete(&material, request.difficulty, request.question_count)
            .await?;

        let (questions, warnings) = normalize_batch(raw, request.question_count);
        if questions.is_empty() {
            return Err(AppError::UpstreamError(
                "Model returned no usable questions".to_string(),
            ));
        }

        let snippet: String = material.chars().take(500).collect();
        let mut quiz = Quiz::new(
            &request.title,
            None,
            request.category,
            request.difficulty,
            &author.sub,
            request.source_kind,
            Some(snippet),
        );
        quiz.set_questions(questions);

        let degraded = !warnings.is_empty();
        if degraded {
            log::warn!(
                "Quiz {} generated with {} repairs: {:?}",
                quiz.id,
                warnings.len(),
                warnings
            );
        }

        let quiz = self.quizzes.create(quiz).await?;
        log::info!(
            "User {} generated quiz {} with {} questions",
            author.sub,
            quiz.id,
            quiz.question_count
        );

        Ok(GenerationReport {
            quiz,
            degraded,
            warnings,
        })
    }

    async fn complete(
        &self,
        material: &str,
        difficulty: crate::models::domain::Difficulty,
        question_count: usize,
    ) -> AppResult<Vec<RawQuestion>> {
        let user_prompt = format!(
            "Create {} questions at {:?} difficulty from this material:\n\n{}",
            question_count, difficulty, material
        );

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(QUIZ_GENERATION_SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::UpstreamError("Model returned no content".to_string()))?;

        parse_batch(&content)
    }
}

fn parse_batch(content: &str) -> AppResult<Vec<RawQuestion>> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(cleaned)
        .map_err(|e| AppError::UpstreamError(format!("Model output was not valid JSON: {}", e)))
}

/// Models often wrap JSON in a markdown fence despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Repairs a raw batch into exactly `requested` well-formed questions.
///
/// Per question: exactly one correct answer (first flagged wins; none flagged
/// promotes the first option), exactly four options (padded with placeholders
/// or truncated, keeping the correct one). Short batches are padded with
/// answerless placeholder questions, long ones truncated. Every repair is
/// reported as a warning.
fn normalize_batch(raw: Vec<RawQuestion>, requested: usize) -> (Vec<Question>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut questions = Vec::with_capacity(requested);

    if raw.len() > requested {
        warnings.push(format!(
            "Model produced {} questions, truncated to {}",
            raw.len(),
            requested
        ));
    }

    for (index, raw_question) in raw.into_iter().take(requested).enumerate() {
        let number = index + 1;

        if raw_question.answers.is_empty() {
            warnings.push(format!("Question {} arrived without answers", number));
            questions.push(Question::new(
                &raw_question.question,
                raw_question.explanation,
                vec![],
            ));
            continue;
        }

        let mut answers = raw_question.answers;

        let correct_count = answers.iter().filter(|a| a.is_correct).count();
        match correct_count {
            1 => {}
            0 => {
                warnings.push(format!(
                    "Question {} had no correct answer, promoted the first option",
                    number
                ));
                answers[0].is_correct = true;
            }
            n => {
                warnings.push(format!(
                    "Question {} flagged {} answers correct, kept the first",
                    number, n
                ));
                let mut seen = false;
                for answer in answers.iter_mut() {
                    if answer.is_correct {
                        answer.is_correct = !seen;
                        seen = true;
                    }
                }
            }
        }

        if answers.len() > ANSWERS_PER_QUESTION {
            warnings.push(format!(
                "Question {} had {} options, truncated to {}",
                number,
                answers.len(),
                ANSWERS_PER_QUESTION
            ));
            // Keep the correct option inside the window before cutting.
            if let Some(correct_index) = answers.iter().position(|a| a.is_correct) {
                if correct_index >= ANSWERS_PER_QUESTION {
                    answers.swap(ANSWERS_PER_QUESTION - 1, correct_index);
                }
            }
            answers.truncate(ANSWERS_PER_QUESTION);
        } else if answers.len() < ANSWERS_PER_QUESTION {
            warnings.push(format!(
                "Question {} had {} options, padded to {}",
                number,
                answers.len(),
                ANSWERS_PER_QUESTION
            ));
            while answers.len() < ANSWERS_PER_QUESTION {
                answers.push(RawAnswer {
                    text: format!("None of the above ({})", answers.len() + 1),
                    is_correct: false,
                });
            }
        }

        let domain_answers: Vec<Answer> = answers
            .into_iter()
            .map(|a| Answer::new(&a.text, a.is_correct))
            .collect();

        questions.push(Question::new(
            &raw_question.question,
            raw_question.explanation,
            domain_answers,
        ));
    }

    if questions.len() < requested && !questions.is_empty() {
        warnings.push(format!(
            "Model produced {} of {} requested questions, padded with placeholders",
            questions.len(),
            requested
        ));
        while questions.len() < requested {
            questions.push(Question::new(
                &format!("Placeholder question {}", questions.len() + 1),
                Some("Generation fell short; replace this question.".to_string()),
                vec![],
            ));
        }
    }

    (questions, warnings)
}
