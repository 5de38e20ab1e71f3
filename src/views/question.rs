use maud::{html, Markup};

use crate::db::models::{Question, QuizChoice};
use crate::difficulty;
use crate::names;

pub fn question_list(questions: Vec<Question>) -> Markup {
    html! {
        h1 { "My Questions" }
        p { a role="button" href=(names::CREATE_QUESTION_URL) { "Add a question" } }
        @if questions.is_empty() {
            p { "No questions yet." }
        } @else {
            table {
                thead {
                    tr {
                        th { "Question" }
                        th { "Difficulty" }
                        th {}
                    }
                }
                tbody {
                    @for q in &questions {
                        tr {
                            td { a href=(names::question_url(q.id)) { (q.question) } }
                            td { (q.difficulty) }
                            td {
                                form action=(names::delete_question_url(q.id)) method="post" {
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

fn difficulty_radios(selected: Option<i64>) -> Markup {
    html! {
        fieldset {
            legend { "Difficulty" }
            @for band in difficulty::MIN_BAND..=difficulty::MAX_BAND {
                label {
                    @if selected == Some(band) {
                        input type="radio" name="difficulty" value=(band) checked;
                    } @else {
                        input type="radio" name="difficulty" value=(band);
                    }
                    (band)
                }
            }
        }
    }
}

pub fn create_question(error: Option<&str>) -> Markup {
    html! {
        h1 { "Add Question" }
        @if let Some(msg) = error {
            p { mark { (msg) } }
        }
        article {
            form action=(names::CREATE_QUESTION_URL) method="post" {
                label {
                    "Question"
                    input name="question" type="text" required="true" placeholder="Question";
                }
                label {
                    "Answer"
                    input name="answer" type="text" required="true" placeholder="Answer";
                }
                (difficulty_radios(None))
                button type="submit" { "Add question" }
            }
        }
    }
}

pub fn edit_question(question: &Question, error: Option<&str>) -> Markup {
    html! {
        h1 { "Edit Question" }
        @if let Some(msg) = error {
            p { mark { (msg) } }
        }
        article {
            form action=(names::edit_question_url(question.id)) method="post" {
                label {
                    "Question"
                    input name="question" type="text" required="true" value=(question.question);
                }
                label {
                    "Answer"
                    input name="answer" type="text" required="true" value=(question.answer);
                }
                (difficulty_radios(Some(question.difficulty)))
                button type="submit" { "Save" }
            }
        }
    }
}

pub fn show_question(
    question: &Question,
    quiz_choices: Vec<QuizChoice>,
    error: Option<&str>,
) -> Markup {
    html! {
        h1 { "Question" }
        article {
            p { strong { (question.question) } }
            p { "Answer: " (question.answer) }
            p { "Difficulty: " (question.difficulty) }
            p { a role="button" class="outline" href=(names::edit_question_url(question.id)) { "Edit" } }
        }
        @if let Some(msg) = error {
            p { mark { (msg) } }
        }
        @if quiz_choices.is_empty() {
            p { "This question is already on every quiz you own." }
        } @else {
            article {
                h2 { "Add to a quiz" }
                form action=(names::question_url(question.id)) method="post" {
                    label {
                        "Quiz"
                        select name="quiz_id" {
                            @for quiz in &quiz_choices {
                                option value=(quiz.id) { (quiz.name) " (" (quiz.rounds) " rounds)" }
                            }
                        }
                    }
                    label {
                        "Round"
                        input name="round"
                              type="number"
                              min=(names::MIN_ROUNDS)
                              max=(names::MAX_ROUNDS)
                              value="1";
                    }
                    button type="submit" { "Add to quiz" }
                }
            }
        }
        p { a href=(names::QUESTION_LIST_URL) { "Back to questions" } }
    }
}
