use contracts::domain::a001_cart::aggregate::CartItem;
use leptos::prelude::*;
use thaw::*;

use super::quantity::QuantityEditor;
use crate::domain::a001_cart::store::use_cart_store;
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_price;

/// Header button with the number of items in the cart
#[component]
pub fn CartBadge() -> impl IntoView {
    let cart = use_cart_store();
    let ctx = use_global_context();

    view! {
        <Button
            appearance=ButtonAppearance::Subtle
            on_click=move |_| ctx.cart_open.update(|open| *open = !*open)
        >
            "Cart "
            <Badge appearance=BadgeAppearance::Filled color=BadgeColor::Brand>
                {move || cart.total_items().to_string()}
            </Badge>
        </Button>
    }
}

#[component]
fn CartLine(item: CartItem) -> impl IntoView {
    let cart = use_cart_store();
    let ctx = use_global_context();
    let id = item.id;
    let quantity = Signal::derive(move || cart.quantity_of(id).unwrap_or(0));
    let line_total = move || {
        let qty = quantity.get();
        format_price(item.price * f64::from(qty))
    };

    view! {
        <li class="cart-line">
            {(!item.image.is_empty()).then(|| view! {
                <img class="cart-line__image" src=ctx.image_url(&item.image) alt=item.name.clone() />
            })}
            <div class="cart-line__body">
                <div class="cart-line__name">{item.name.clone()}</div>
                <div class="cart-line__price">{format_price(item.price)}</div>
                <QuantityEditor
                    quantity=quantity
                    on_change=Callback::new(move |qty: u32| cart.update_cart(id, qty))
                />
            </div>
            <div class="cart-line__total">{line_total}</div>
            <Button
                size=ButtonSize::Small
                appearance=ButtonAppearance::Secondary
                on_click=move |_| cart.remove_cart(id)
            >
                "Remove"
            </Button>
        </li>
    }
}

/// Slide-over listing the cart lines with their totals
#[component]
pub fn CartSheet() -> impl IntoView {
    let cart = use_cart_store();
    let ctx = use_global_context();

    let line_ids = Memo::new(move |_| {
        cart.carts().iter().map(|c| c.id).collect::<Vec<_>>()
    });

    view! {
        <Show when=move || ctx.cart_open.get()>
            <div class="cart-sheet__backdrop" on:click=move |_| ctx.cart_open.set(false)></div>
            <aside class="cart-sheet">
                <div class="cart-sheet__header">
                    <h2>"Your cart"</h2>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| ctx.cart_open.set(false)>
                        "✕"
                    </Button>
                </div>

                <Show
                    when=move || !line_ids.with(Vec::is_empty)
                    fallback=|| view! { <p class="cart-sheet__empty">"Your cart is empty."</p> }
                >
                    <ul class="cart-sheet__lines">
                        {move || {
                            line_ids.track();
                            untrack(|| cart.carts())
                                .into_iter()
                                .map(|item| view! { <CartLine item=item /> })
                                .collect_view()
                        }}
                    </ul>
                    <div class="cart-sheet__totals">
                        <span>{move || format!("Items: {}", cart.total_items())}</span>
                        <strong>{move || format!("Total: {}", format_price(cart.total_price()))}</strong>
                    </div>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| cart.clear_cart()>
                        "Clear cart"
                    </Button>
                </Show>
            </aside>
        </Show>
    }
}
