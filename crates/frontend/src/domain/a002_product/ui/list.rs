use contracts::domain::a002_product::aggregate::{Product, ProductPage};
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;
use thaw::*;

use super::filter_panel::FilterPanel;
use crate::domain::a001_cart::store::use_cart_store;
use crate::domain::a002_product::api::{fetch_products_page, product_list_key};
use crate::domain::a002_product::filter_store::{use_filter_store, FilterState};
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_price;
use crate::shared::query::InfiniteList;

#[component]
fn ProductCard(product: Product) -> impl IntoView {
    let ctx = use_global_context();
    let cart = use_cart_store();
    let href = format!("/products/{}", product.id);
    let image = product.first_image().map(|path| ctx.image_url(path));
    let in_stock = product.in_stock();
    let line = product.to_cart_item(1);
    let name = product.name.clone();
    let alt = product.name.clone();

    view! {
        <Card class="product-card">
            <A href=href.clone()>
                {image.map(move |src| view! { <img class="product-card__image" src=src alt=alt /> })}
            </A>
            <div class="product-card__body">
                <A href=href>
                    <span class="product-card__name">{name}</span>
                </A>
                <span class="product-card__price">{format_price(product.price)}</span>
                {(!in_stock).then(|| view! {
                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Danger>"Out of stock"</Badge>
                })}
            </div>
            <Button
                appearance=ButtonAppearance::Primary
                disabled=!in_stock
                on_click=move |_| {
                    cart.add_to_cart(line.clone());
                    ctx.cart_open.set(true);
                }
            >
                "Add to cart"
            </Button>
        </Card>
    }
}

/// Product grid driven by `?categories=..&types=..`, loaded page by page
#[component]
pub fn ProductList() -> impl IntoView {
    let ctx = use_global_context();
    let filters = use_filter_store();
    let query = use_query_map();

    let selection = Memo::new(move |_| {
        query.with(|q| FilterState::from_query(q.get_str("categories"), q.get_str("types")))
    });

    let list: InfiniteList<ProductPage> = InfiniteList::new(
        product_list_key(&selection.get_untracked()),
        &ctx.queries(),
    );

    let load_more = move || {
        let client = ctx.api();
        let limit = ctx.config().cache.products_page_size;
        let filter = selection.get_untracked();
        list.load_more(ctx.queries(), move |cursor| async move {
            fetch_products_page(&client, limit, cursor, &filter).await
        });
    };

    Effect::new(move |_| {
        let selected = selection.get();
        filters.add_categories(&selected.categories);
        filters.add_types(&selected.types);
        list.switch_to(product_list_key(&selected), &ctx.queries());
        if !list.state().with_untracked(|q| q.is_started()) {
            load_more();
        }
    });

    let state = list.state();
    let can_load_more = Signal::derive(move || state.with(|q| q.has_next_page() && !q.is_loading()));

    view! {
        <div class="page storefront-products">
            <FilterPanel />
            <section class="product-grid">
                {move || state.with(|q| q.error().map(str::to_string)).map(|e| view! {
                    <div class="warning-box">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{e}</span>
                        <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_more()>
                            "Retry"
                        </Button>
                    </div>
                })}
                <div class="product-grid__items">
                    {move || state.with(|q| q.items().cloned().collect::<Vec<_>>())
                        .into_iter()
                        .map(|product| view! { <ProductCard product=product /> })
                        .collect_view()}
                </div>
                <Show when=move || state.with(|q| q.is_started() && q.item_count() == 0 && !q.is_loading())>
                    <p class="product-grid__empty">"No products match these filters."</p>
                </Show>
                <Show when=move || state.with(|q| q.is_loading())>
                    <Spinner />
                </Show>
                <Show when=move || can_load_more.get()>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_more()>
                        "Load more"
                    </Button>
                </Show>
            </section>
        </div>
    }
}
