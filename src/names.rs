pub const LOGIN_URL: &str = "/login";
pub const REGISTER_URL: &str = "/register";
pub const LOGOUT_URL: &str = "/logout";
pub const DELETE_PROFILE_URL: &str = "/delete-profile";

pub const QUIZ_LIST_URL: &str = "/quizzes";
pub const CREATE_QUIZ_URL: &str = "/quizzes/create";
pub const QUESTION_LIST_URL: &str = "/questions";
pub const CREATE_QUESTION_URL: &str = "/questions/create";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub fn quiz_url(quiz_id: i64) -> String {
    format!("/quizzes/{quiz_id}")
}

pub fn edit_quiz_url(quiz_id: i64) -> String {
    format!("/quizzes/{quiz_id}/edit")
}

pub fn delete_quiz_url(quiz_id: i64) -> String {
    format!("/quizzes/{quiz_id}/delete")
}

pub fn replace_questions_url(quiz_id: i64) -> String {
    format!("/quizzes/{quiz_id}/replace")
}

pub fn remove_question_url(quiz_id: i64, question_id: i64) -> String {
    format!("/quizzes/{quiz_id}/remove/{question_id}")
}

pub fn question_url(question_id: i64) -> String {
    format!("/questions/{question_id}")
}

pub fn edit_question_url(question_id: i64) -> String {
    format!("/questions/{question_id}/edit")
}

pub fn delete_question_url(question_id: i64) -> String {
    format!("/questions/{question_id}/delete")
}

// Quiz shape limits, mirrored in the create-quiz form.
pub const MAX_QUIZ_NAME_LEN: usize = 50;
pub const MAX_QUIZ_DESCRIPTION_LEN: usize = 250;
pub const MIN_ROUNDS: i64 = 1;
pub const MAX_ROUNDS: i64 = 5;
pub const QUESTIONS_PER_ROUND_CHOICES: &[i64] = &[5, 10, 15, 20];

pub const MIN_PASSWORD_LEN: usize = 6;
