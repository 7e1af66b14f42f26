//! Sign-in form against the token endpoint.

use dioxus::prelude::*;

use api::ApiClient;

use crate::components::app_navbar;
use crate::core::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormStatus {
    Idle,
    Loading,
    Success,
}

#[component]
pub fn Login() -> Element {
    let client = use_context::<ApiClient>();

    let username = use_signal(String::new);
    let password = use_signal(String::new);
    let status = use_signal(|| FormStatus::Idle);
    let error_message = use_signal(|| Option::<String>::None);

    let submit = {
        let client = client.clone();
        move |_| {
            if status() != FormStatus::Idle {
                return;
            }

            let user = username().trim().to_string();
            let pass = password();
            let mut status = status;
            let mut error_message = error_message;

            // Required-field validation blocks the request entirely.
            if user.is_empty() || pass.is_empty() {
                error_message.set(Some("Username and password are required.".to_string()));
                return;
            }

            status.set(FormStatus::Loading);
            error_message.set(None);

            let client = client.clone();
            spawn(async move {
                match client.login(&user, &pass).await {
                    Ok(tokens) => {
                        if let Err(err) = storage::save_tokens(&tokens) {
                            tracing::warn!(%err, "token persistence failed");
                        }
                        status.set(FormStatus::Success);
                    }
                    Err(err) => {
                        error_message.set(Some(err.to_string()));
                        status.set(FormStatus::Idle);
                    }
                }
            });
        }
    };

    let button_label = match status() {
        FormStatus::Idle => "LOGIN",
        FormStatus::Loading => "Signing in...",
        FormStatus::Success => "SUCCESS!",
    };

    rsx! {
        section { class: "page page-auth",
            div { class: "auth-card",
                h2 { "Welcome Back" }
                form { class: "auth-form",
                    div { class: "input-group",
                        input {
                            r#type: "text",
                            placeholder: "Username",
                            value: "{username}",
                            oninput: {
                                let mut username = username;
                                move |evt: FormEvent| username.set(evt.value())
                            },
                        }
                    }
                    div { class: "input-group",
                        input {
                            r#type: "password",
                            placeholder: "Password",
                            value: "{password}",
                            oninput: {
                                let mut password = password;
                                move |evt: FormEvent| password.set(evt.value())
                            },
                        }
                    }
                    button {
                        r#type: "button",
                        class: "btn btn-submit",
                        disabled: status() != FormStatus::Idle,
                        onclick: submit,
                        "{button_label}"
                    }

                    if let Some(message) = error_message() {
                        div { class: "form-error", "{message}" }
                    }
                    if status() == FormStatus::Success {
                        div { class: "form-success",
                            "Signed in. "
                            {app_navbar::analysis_link("Continue to analysis")}
                        }
                    }

                    div { class: "auth-switch",
                        p {
                            "Don't have an account? "
                            {app_navbar::register_link("Sign Up")}
                        }
                    }
                }
            }
        }
    }
}
