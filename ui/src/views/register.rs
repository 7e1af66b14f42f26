//! Account creation form with inline validation and a strength meter.

use dioxus::prelude::*;

use api::ApiClient;

use crate::components::app_navbar;
use crate::core::timing;

/// Characters the strength meter counts as special.
const SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

/// How long the success banner stays up.
const SUCCESS_BANNER_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PasswordCheck {
    pub strength: u8,
    pub color: &'static str,
    pub has_length: bool,
    pub has_number: bool,
    pub has_special: bool,
}

pub(crate) fn check_password(password: &str) -> PasswordCheck {
    let has_length = password.chars().count() >= 8;
    let has_number = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SPECIALS.contains(c));

    let met = [has_length, has_number, has_special]
        .iter()
        .filter(|m| **m)
        .count() as u8;
    let strength = if met == 3 { 100 } else { met * 33 };
    let color = match strength {
        s if s > 67 => "#2eb82e",
        s if s > 34 => "#ffa64d",
        _ => "#ff4d4d",
    };

    PasswordCheck {
        strength,
        color,
        has_length,
        has_number,
        has_special,
    }
}

#[component]
pub fn Register() -> Element {
    let client = use_context::<ApiClient>();

    let username = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let confirm = use_signal(String::new);
    let terms = use_signal(|| false);
    let loading = use_signal(|| false);
    let success = use_signal(|| false);
    let error_message = use_signal(|| Option::<String>::None);

    let check = check_password(&password());

    let submit = {
        let client = client.clone();
        move |_| {
            if loading() {
                return;
            }

            let mut loading = loading;
            let mut success = success;
            let mut error_message = error_message;
            let mut username_sig = username;
            let mut email_sig = email;
            let mut password_sig = password;
            let mut confirm_sig = confirm;
            let mut terms_sig = terms;

            let user = username().trim().to_string();
            let mail = email().trim().to_string();
            let pass = password();

            // Validation failures surface inline and block the request.
            if user.is_empty() || mail.is_empty() || pass.is_empty() {
                error_message.set(Some("All fields are required.".to_string()));
                return;
            }
            if pass != confirm() {
                error_message.set(Some("Passwords do not match!".to_string()));
                return;
            }
            if !terms() {
                error_message.set(Some("Please accept the Terms of Service.".to_string()));
                return;
            }

            loading.set(true);
            error_message.set(None);

            let client = client.clone();
            spawn(async move {
                match client.register(&user, &mail, &pass).await {
                    Ok(()) => {
                        success.set(true);
                        username_sig.set(String::new());
                        email_sig.set(String::new());
                        password_sig.set(String::new());
                        confirm_sig.set(String::new());
                        terms_sig.set(false);

                        timing::sleep_ms(SUCCESS_BANNER_MS).await;
                        success.set(false);
                    }
                    Err(err) => {
                        error_message.set(Some(err.to_string()));
                    }
                }
                loading.set(false);
            });
        }
    };

    let requirement_class = |met: bool| {
        if met {
            "requirement met"
        } else {
            "requirement"
        }
    };

    rsx! {
        section { class: "page page-auth",
            div { class: "auth-card",
                h2 { "Create Account" }

                if success() {
                    div { class: "form-success", "Account created successfully!" }
                }

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
                            r#type: "email",
                            placeholder: "Email Address",
                            value: "{email}",
                            oninput: {
                                let mut email = email;
                                move |evt: FormEvent| email.set(evt.value())
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
                        div { class: "password-strength",
                            div {
                                class: "strength-meter",
                                style: "width: {check.strength}%; background: {check.color};",
                            }
                        }
                        div { class: "password-requirements",
                            div { class: requirement_class(check.has_length), "At least 8 characters" }
                            div { class: requirement_class(check.has_number), "Contains a number" }
                            div { class: requirement_class(check.has_special), "Contains a special character" }
                        }
                    }
                    div { class: "input-group",
                        input {
                            r#type: "password",
                            placeholder: "Confirm Password",
                            value: "{confirm}",
                            oninput: {
                                let mut confirm = confirm;
                                move |evt: FormEvent| confirm.set(evt.value())
                            },
                        }
                    }
                    div { class: "terms",
                        label {
                            input {
                                r#type: "checkbox",
                                checked: terms(),
                                oninput: {
                                    let mut terms = terms;
                                    move |evt: FormEvent| terms.set(evt.checked())
                                },
                            }
                            "I agree to the Terms of Service and Privacy Policy"
                        }
                    }

                    button {
                        r#type: "button",
                        class: "btn btn-submit",
                        disabled: loading(),
                        onclick: submit,
                        if loading() { "CREATING..." } else { "CREATE ACCOUNT" }
                    }

                    if let Some(message) = error_message() {
                        div { class: "form-error", "{message}" }
                    }

                    div { class: "auth-switch",
                        p {
                            "Already have an account? "
                            {app_navbar::login_link("Sign In")}
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_is_weak_and_red() {
        let check = check_password("");
        assert_eq!(check.strength, 0);
        assert_eq!(check.color, "#ff4d4d");
        assert!(!check.has_length);
    }

    #[test]
    fn partial_requirements_land_in_the_middle() {
        let check = check_password("longenough");
        assert!(check.has_length);
        assert!(!check.has_number);
        assert_eq!(check.strength, 33);

        let check = check_password("longenough7");
        assert_eq!(check.strength, 66);
        assert_eq!(check.color, "#ffa64d");
    }

    #[test]
    fn all_requirements_score_full_green() {
        let check = check_password("longenough7!");
        assert!(check.has_length && check.has_number && check.has_special);
        assert_eq!(check.strength, 100);
        assert_eq!(check.color, "#2eb82e");
    }
}
