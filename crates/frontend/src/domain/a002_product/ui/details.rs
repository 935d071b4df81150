use contracts::domain::a002_product::aggregate::Product;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use thaw::*;

use crate::domain::a001_cart::store::use_cart_store;
use crate::domain::a001_cart::ui::QuantityEditor;
use crate::domain::a002_product::api::{
    fetch_product, product_detail_key, toggle_favourite, toggle_favourite_optimistic,
};
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_price;
use crate::shared::http::ApiError;
use crate::system::auth::context::use_auth;

#[derive(Debug, Clone, PartialEq)]
enum DetailState {
    Loading,
    Loaded(Product),
    NotFound,
    Failed(String),
}

#[component]
pub fn ProductDetails() -> impl IntoView {
    let ctx = use_global_context();
    let cart = use_cart_store();
    let auth = use_auth();
    let params = use_params_map();

    let product_id = Memo::new(move |_| {
        params.with(|p| p.get_str("id").and_then(|id| id.parse::<i64>().ok()))
    });
    let state = RwSignal::new(DetailState::Loading);
    let quantity = RwSignal::new(1u32);
    let favourite_error = RwSignal::new(None::<String>);

    let load = move |id: i64| {
        state.set(DetailState::Loading);
        let client = ctx.api();
        let queries = ctx.queries();
        spawn_local(async move {
            let result = queries
                .fetch_query(product_detail_key(id), || fetch_product(&client, id))
                .await;
            state.set(match result {
                Ok(product) => DetailState::Loaded(product),
                Err(ApiError::NotFound) => DetailState::NotFound,
                Err(e) => {
                    log::warn!("product {} not loaded: {}", id, e);
                    DetailState::Failed(e.to_string())
                }
            });
        });
    };

    Effect::new(move |_| match product_id.get() {
        Some(id) => load(id),
        None => state.set(DetailState::NotFound),
    });

    let toggle = move || {
        let DetailState::Loaded(current) = state.get_untracked() else {
            return;
        };
        let favourite = !current.is_favourite();
        favourite_error.set(None);
        state.update(|s| {
            if let DetailState::Loaded(p) = s {
                p.set_favourite(favourite);
            }
        });

        let client = ctx.api();
        let queries = ctx.queries();
        spawn_local(async move {
            let sent = toggle_favourite_optimistic(&queries, current.id, favourite, |request| async move {
                toggle_favourite(&client, &request).await
            })
            .await;
            if let Err(e) = sent {
                state.set(DetailState::Loaded(current));
                favourite_error.set(Some(format!("Could not update favourites: {}", e)));
            }
        });
    };

    view! {
        <div class="page product-details">
            {move || match state.get() {
                DetailState::Loading => view! { <Spinner /> }.into_any(),
                DetailState::NotFound => view! {
                    <div class="empty-state">
                        <p>"This product does not exist."</p>
                        <A href="/products">"Back to products"</A>
                    </div>
                }.into_any(),
                DetailState::Failed(e) => view! {
                    <div class="warning-box">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{e}</span>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| {
                                if let Some(id) = product_id.get_untracked() {
                                    load(id);
                                }
                            }
                        >
                            "Retry"
                        </Button>
                    </div>
                }.into_any(),
                DetailState::Loaded(product) => {
                    let line = product.clone();
                    let is_favourite = product.is_favourite();
                    view! {
                        <div class="product-details__layout">
                            <div class="product-details__gallery">
                                {product.images.iter().map(|image| view! {
                                    <img src=ctx.image_url(&image.path) alt=product.name.clone() />
                                }).collect_view()}
                            </div>
                            <div class="product-details__info">
                                <h1>{product.name.clone()}</h1>
                                <p class="product-details__price">{format_price(product.price)}</p>
                                <p class="product-details__description">{product.description.clone()}</p>
                                <Flex align=FlexAlign::Center gap=FlexGap::Medium>
                                    <QuantityEditor
                                        quantity=quantity
                                        on_change=Callback::new(move |qty: u32| quantity.set(qty))
                                    />
                                    <Button
                                        appearance=ButtonAppearance::Primary
                                        disabled=!product.in_stock()
                                        on_click=move |_| {
                                            cart.add_to_cart(line.to_cart_item(quantity.get_untracked()));
                                            ctx.cart_open.set(true);
                                        }
                                    >
                                        "Add to cart"
                                    </Button>
                                    <Show when=move || auth.is_authenticated()>
                                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| toggle()>
                                            {if is_favourite { "♥ Saved" } else { "♡ Save" }}
                                        </Button>
                                    </Show>
                                </Flex>
                                {move || favourite_error.get().map(|e| view! {
                                    <span class="product-details__error">{e}</span>
                                })}
                            </div>
                        </div>
                    }.into_any()
                }
            }}
        </div>
    }
}
