use contracts::shared::ValidationErrors;
use contracts::system::auth::ChangePasswordRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::layout::global_context::use_global_context;
use crate::system::auth::api;

/// Sections of the account area; only password and security has a page so far
const SECTIONS: [(&str, bool); 6] = [
    ("Profiles", false),
    ("Password and security", true),
    ("Personal details", false),
    ("Your information and permissions", false),
    ("Subscriptions", false),
    ("Accounts", false),
];

#[component]
pub fn AccountSettingPage() -> impl IntoView {
    view! {
        <div class="page account-setting">
            <aside class="account-setting__nav">
                <h2>"Account settings"</h2>
                <nav>
                    {SECTIONS.iter().map(|&(label, active)| {
                        let class = if active {
                            "account-setting__item account-setting__item--active"
                        } else {
                            "account-setting__item"
                        };
                        view! { <span class=class>{label}</span> }
                    }).collect_view()}
                </nav>
            </aside>
            <section class="account-setting__content">
                <h1>"Password and security"</h1>
                <p class="account-setting__hint">
                    "Manage your password and security settings to keep your account safe."
                </p>
                <div class="account-setting__card">
                    <h2>"Change password"</h2>
                    <ChangePasswordForm />
                </div>
            </section>
        </div>
    }
}

#[component]
fn ChangePasswordForm() -> impl IntoView {
    let ctx = use_global_context();
    let navigate = use_navigate();

    let (current, set_current) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (field_errors, set_field_errors) = signal(ValidationErrors::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let reset = move || {
        set_current.set(String::new());
        set_new_password.set(String::new());
        set_confirm.set(String::new());
        set_field_errors.set(ValidationErrors::new());
        set_error_message.set(None);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = ChangePasswordRequest {
            current_password: current.get_untracked(),
            new_password: new_password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        if let Err(errors) = request.validate() {
            set_field_errors.set(errors);
            return;
        }
        set_field_errors.set(ValidationErrors::new());
        set_error_message.set(None);
        set_is_saving.set(true);

        let client = ctx.api();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::change_password(&client, &request).await {
                Ok(response) => {
                    log::info!("auth: password changed {}", response.message);
                    set_is_saving.set(false);
                    navigate("/", Default::default());
                }
                Err(e) => {
                    log::warn!("auth: password change failed: {}", e);
                    set_error_message.set(Some(format!("Change password failed: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    let field_error = move |field: &'static str| {
        move || {
            field_errors
                .with(|errors| errors.get(field).map(str::to_string))
                .map(|message| view! { <span class="form-group__error">{message}</span> })
        }
    };

    view! {
        <Show when=move || error_message.get().is_some()>
            <div class="error-message">
                {move || error_message.get().unwrap_or_default()}
            </div>
        </Show>

        <form on:submit=on_submit autocomplete="off">
            <div class="form-group">
                <label for="currentPassword">"Current password"</label>
                <input
                    type="password"
                    id="currentPassword"
                    inputmode="numeric"
                    placeholder="Enter your current password"
                    prop:value=move || current.get()
                    on:input=move |ev| set_current.set(event_target_value(&ev))
                    disabled=move || is_saving.get()
                />
                {field_error("current_password")}
            </div>

            <div class="form-group">
                <label for="newPassword">"New password"</label>
                <input
                    type="password"
                    id="newPassword"
                    inputmode="numeric"
                    placeholder="Enter your new password"
                    prop:value=move || new_password.get()
                    on:input=move |ev| set_new_password.set(event_target_value(&ev))
                    disabled=move || is_saving.get()
                />
                {field_error("new_password")}
            </div>

            <div class="form-group">
                <label for="confirmPassword">"Confirm password"</label>
                <input
                    type="password"
                    id="confirmPassword"
                    inputmode="numeric"
                    placeholder="Enter your confirm password"
                    prop:value=move || confirm.get()
                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                    disabled=move || is_saving.get()
                />
                {field_error("confirm_password")}
            </div>

            <div class="account-setting__actions">
                <button
                    type="submit"
                    class="button button--primary"
                    disabled=move || is_saving.get()
                >
                    {move || if is_saving.get() { "Saving..." } else { "Update password" }}
                </button>
                <button type="button" class="button button--secondary" on:click=move |_| reset()>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
