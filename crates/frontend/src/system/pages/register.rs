use contracts::shared::ValidationErrors;
use contracts::system::auth::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::layout::global_context::use_global_context;
use crate::system::auth::{api, context::use_auth};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_global_context();
    let auth = use_auth();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (field_errors, set_field_errors) = signal(ValidationErrors::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = RegisterRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
        };
        if let Err(errors) = request.validate() {
            set_field_errors.set(errors);
            return;
        }
        set_field_errors.set(ValidationErrors::new());
        set_is_loading.set(true);
        set_error_message.set(None);

        let client = ctx.api();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::register(&client, &request).await {
                Ok(response) => {
                    log::info!("auth: registered {}", response.user.email);
                    auth.accept(response);
                    set_is_loading.set(false);
                    navigate("/", Default::default());
                }
                Err(e) => {
                    set_error_message.set(Some(format!("Sign up failed: {}", e)));
                    set_is_loading.set(false);
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
        <div class="login-container">
            <div class="login-box">
                <h2>"Create an account"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
                    <div class="form-group">
                        <label for="username">"Username"</label>
                        <input
                            type="text"
                            id="username"
                            value=move || username.get()
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                            disabled=move || is_loading.get()
                        />
                        {field_error("username")}
                    </div>

                    <div class="form-group">
                        <label for="email">"Email"</label>
                        <input
                            type="email"
                            id="email"
                            value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            disabled=move || is_loading.get()
                        />
                        {field_error("email")}
                    </div>

                    <div class="form-group">
                        <label for="password">"Password"</label>
                        <input
                            type="password"
                            id="password"
                            value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            disabled=move || is_loading.get()
                        />
                        {field_error("password")}
                    </div>

                    <button
                        type="submit"
                        class="button button--primary"
                        disabled=move || is_loading.get()
                    >
                        {move || if is_loading.get() { "Creating..." } else { "Sign up" }}
                    </button>
                </form>

                <p class="login-info">
                    "Already registered? " <A href="/login">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
