use maud::{html, Markup, DOCTYPE};

use crate::{names, utils};

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
    }
}

fn js() -> Markup {
    html! {
        script src="https://cdn.jsdelivr.net/npm/htmx.org@2/dist/htmx.min.js" {}
    }
}

fn header(username: Option<&str>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."secondary" {
                        a href="/" {
                            strong { "Quizforge" }
                        }
                    }
                }
                ul {
                    @if let Some(username) = username {
                        li { a href=(names::QUIZ_LIST_URL) { "My Quizzes" } }
                        li { a href=(names::QUESTION_LIST_URL) { "My Questions" } }
                        li."secondary" { (username) }
                        li {
                            form action=(names::LOGOUT_URL) method="post" {
                                button."outline secondary" { "Log out" }
                            }
                        }
                    } @else {
                        li."secondary" { (utils::VERSION) }
                    }
                }
            }
        }
    }
}

fn main(body: Markup) -> Markup {
    html! {
        main { (body) }
    }
}

fn document(title: &str, body: Markup, username: Option<&str>) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())
            (js())

            title { (format!("{title} - Quizforge")) }
        }

        // hx-boost turns plain links and forms into htmx requests, which is
        // what the CSRF middleware keys on.
        body."container" hx-boost="true" {
            (header(username))
            (main(body))
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    document(title, body, None)
}

pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - Quizforge" }
        (body)
    }
}

pub fn render(is_htmx: bool, title: &str, body: Markup, username: Option<&str>) -> Markup {
    if is_htmx {
        titled(title, body)
    } else {
        document(title, body, username)
    }
}
