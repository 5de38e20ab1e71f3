use maud::{html, Markup};

use crate::names;

pub fn landing_page() -> Markup {
    html! {
        section {
            h1 { "Build pub-quality trivia quizzes" }
            p {
                "Write your own questions or pull them from a trivia archive, "
                "sorted into difficulty bands, assembled round by round."
            }
            div {
                a role="button" href=(names::REGISTER_URL) { "Sign up" }
                " "
                a role="button" class="outline" href=(names::LOGIN_URL) { "Log in" }
            }
        }
    }
}

pub enum RegisterState {
    NoError,
    UsernameTaken,
    EmptyFields,
    WeakPassword,
}

pub fn register(state: RegisterState) -> Markup {
    let error_msg = match state {
        RegisterState::NoError => None,
        RegisterState::UsernameTaken => Some("Username already taken"),
        RegisterState::EmptyFields => Some("Username and password are required"),
        RegisterState::WeakPassword => Some(
            "Password must be at least six characters long",
        ),
    };

    html! {
        h1 { "Register" }
        article style="width: fit-content;" {
            @if let Some(msg) = error_msg {
                p { mark { (msg) } }
            }
            form action=(names::REGISTER_URL) method="post" {
                label {
                    "Username"
                    input name="username"
                          type="text"
                          autocomplete="username"
                          required="true"
                          placeholder="Username";
                }
                label {
                    "Password"
                    input name="password"
                          type="password"
                          autocomplete="new-password"
                          required="true"
                          placeholder="Password";
                }
                button type="submit" { "Sign up" }
            }
            p {
                "Already have an account? "
                a href=(names::LOGIN_URL) { "Log in" }
            }
        }
    }
}

pub enum LoginState {
    NoError,
    InvalidCredentials,
}

pub fn login(state: LoginState) -> Markup {
    html! {
        h1 { "Log In" }
        article style="width: fit-content;" {
            @if let LoginState::InvalidCredentials = state {
                p { mark { "Invalid credentials" } }
            }
            form action=(names::LOGIN_URL) method="post" {
                label {
                    "Username"
                    input name="username"
                          type="text"
                          autocomplete="username"
                          required="true"
                          placeholder="Username";
                }
                label {
                    "Password"
                    input name="password"
                          type="password"
                          autocomplete="current-password"
                          required="true"
                          placeholder="Password";
                }
                button type="submit" { "Log in" }
            }
            p {
                "New here? "
                a href=(names::REGISTER_URL) { "Sign up" }
            }
        }
    }
}

pub fn delete_profile_page() -> Markup {
    html! {
        h1 { "Delete profile" }
        article {
            p {
                "Deleting your profile also deletes every quiz and every "
                "question you own. This cannot be undone."
            }
            form action=(names::DELETE_PROFILE_URL) method="post" {
                button class="contrast" { "Delete my profile" }
            }
            p { a href="/" { "Take me back" } }
        }
    }
}
