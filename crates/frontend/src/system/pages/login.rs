use contracts::shared::ValidationErrors;
use contracts::system::auth::LoginRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::layout::global_context::use_global_context;
use crate::system::auth::{api, context::use_auth};

/// Sign-in form. `redirect_to` is where a successful sign-in lands.
#[component]
pub fn LoginPage(
    #[prop(optional, into)] redirect_to: Option<String>,
    /// Show the "create an account" link (storefront only)
    #[prop(optional)]
    allow_register: bool,
) -> impl IntoView {
    let ctx = use_global_context();
    let auth = use_auth();
    let navigate = use_navigate();
    let redirect_to = redirect_to.unwrap_or_else(|| "/".to_string());

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (field_errors, set_field_errors) = signal(ValidationErrors::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let request = LoginRequest {
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
        let redirect_to = redirect_to.clone();
        spawn_local(async move {
            match api::login(&client, &request).await {
                Ok(response) => {
                    log::info!("auth: signed in as {}", response.user.email);
                    auth.accept(response);
                    set_is_loading.set(false);
                    navigate(&redirect_to, Default::default());
                }
                Err(e) => {
                    set_error_message.set(Some(format!("Login failed: {}", e)));
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
                <h2>"Sign in"</h2>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=on_submit>
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
                        {move || if is_loading.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>

                {allow_register.then(|| view! {
                    <p class="login-info">
                        "No account yet? " <A href="/register">"Create one"</A>
                    </p>
                })}
            </div>
        </div>
    }
}
