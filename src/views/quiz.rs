use maud::{html, Markup};

use crate::db::models::{Quiz, QuizSummary, RoundQuestion};
use crate::difficulty;
use crate::names;

pub fn quiz_list(quizzes: Vec<QuizSummary>) -> Markup {
    html! {
        h1 { "My Quizzes" }
        p { a role="button" href=(names::CREATE_QUIZ_URL) { "Create a quiz" } }
        @if quizzes.is_empty() {
            p { "No quizzes yet." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Name" }
                        th { "Rounds" }
                        th { "Questions" }
                        th {}
                    }
                }
                tbody {
                    @for quiz in &quizzes {
                        tr {
                            td { a href=(names::quiz_url(quiz.id)) { (quiz.name) } }
                            td { (quiz.rounds) }
                            td { (quiz.question_count) }
                            td {
                                form action=(names::delete_quiz_url(quiz.id)) method="post" {
                                    button."outline secondary" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn difficulty_checkboxes(round: i64) -> Markup {
    html! {
        fieldset {
            legend { "Round " (round) " difficulty" }
            @for band in difficulty::MIN_BAND..=difficulty::MAX_BAND {
                label {
                    input type="checkbox" name=(format!("round_{round}_diff")) value=(band);
                    (band)
                }
            }
        }
    }
}

pub fn create_quiz(error: Option<&str>) -> Markup {
    html! {
        h1 { "Create Quiz" }
        @if let Some(msg) = error {
            p { mark { (msg) } }
        }
        article {
            form action=(names::CREATE_QUIZ_URL) method="post" {
                label {
                    "Quiz name"
                    input name="name"
                          type="text"
                          required="true"
                          maxlength=(names::MAX_QUIZ_NAME_LEN)
                          placeholder="Quiz name";
                }
                label {
                    "Description (optional)"
                    input name="description"
                          type="text"
                          maxlength=(names::MAX_QUIZ_DESCRIPTION_LEN)
                          placeholder="Description";
                }
                label {
                    "Number of rounds"
                    select name="rounds" {
                        @for n in names::MIN_ROUNDS..=names::MAX_ROUNDS {
                            option value=(n) { (n) }
                        }
                    }
                }
                label {
                    "Questions per round"
                    select name="qs_per_round" {
                        @for n in names::QUESTIONS_PER_ROUND_CHOICES {
                            option value=(n) { (n) }
                        }
                    }
                }
                @for round in names::MIN_ROUNDS..=names::MAX_ROUNDS {
                    (difficulty_checkboxes(round))
                }
                button type="submit" { "Create quiz" }
            }
        }
    }
}

/// Shown when a quiz was created but a round could not be filled from the
/// trivia source. The earlier rounds are already in place.
pub fn assembly_failed(quiz_id: i64, round: i64, message: &str) -> Markup {
    html! {
        h1 { "Quiz creation interrupted" }
        p { mark { (message) } }
        p {
            "Round " (round) " could not be filled. Rounds before it were "
            "saved; you can retry from the quiz page."
        }
        p { a role="button" href=(names::quiz_url(quiz_id)) { "View quiz" } }
    }
}

fn round_table(questions: &[&RoundQuestion], with_answers: bool) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Question" }
                    @if with_answers { th { "Answer" } }
                    th { "Difficulty" }
                }
            }
            tbody {
                @for q in questions {
                    tr {
                        td { (q.question) }
                        @if with_answers { td { (q.answer) } }
                        td { (q.difficulty) }
                    }
                }
            }
        }
    }
}

pub fn show_quiz(quiz: &Quiz, questions: &[RoundQuestion]) -> Markup {
    html! {
        h1 { (quiz.name) }
        @if let Some(description) = &quiz.description {
            p { (description) }
        }
        p { a role="button" class="outline" href=(names::edit_quiz_url(quiz.id)) { "Edit quiz" } }
        @for round in 1..=quiz.rounds {
            @let in_round: Vec<&RoundQuestion> =
                questions.iter().filter(|q| q.round == round).collect();
            section {
                h2 { "Round " (round) }
                @if in_round.is_empty() {
                    p { "No questions in this round." }
                } @else {
                    (round_table(&in_round, true))
                }
            }
        }
    }
}

pub fn edit_quiz(quiz: &Quiz, questions: &[RoundQuestion], error: Option<&str>) -> Markup {
    html! {
        h1 { "Edit " (quiz.name) }
        @if let Some(msg) = error {
            p { mark { (msg) } }
        }
        form action=(names::replace_questions_url(quiz.id)) method="post" {
            @for round in 1..=quiz.rounds {
                @let in_round: Vec<&RoundQuestion> =
                    questions.iter().filter(|q| q.round == round).collect();
                section {
                    h2 { "Round " (round) }
                    @if in_round.is_empty() {
                        p { "No questions in this round." }
                    } @else {
                        table {
                            thead {
                                tr {
                                    th { "Replace" }
                                    th { "Question" }
                                    th { "Answer" }
                                    th { "Difficulty" }
                                    th {}
                                }
                            }
                            tbody {
                                @for q in &in_round {
                                    tr {
                                        td {
                                            input type="checkbox"
                                                  name="checked_questions"
                                                  value=(q.id);
                                        }
                                        td { (q.question) }
                                        td { (q.answer) }
                                        td { (q.difficulty) }
                                        td {
                                            button."outline secondary"
                                                   hx-post=(names::remove_question_url(quiz.id, q.id))
                                                   hx-target="body" {
                                                "Remove"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            button type="submit" { "Replace checked questions" }
        }
        p { a href=(names::quiz_url(quiz.id)) { "Back to quiz" } }
    }
}
