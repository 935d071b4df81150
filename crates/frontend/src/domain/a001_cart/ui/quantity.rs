use contracts::domain::a001_cart::aggregate::{
    decrease_quantity, increase_quantity, parse_quantity_input,
};
use leptos::prelude::*;
use thaw::*;

/// Raw text of the quantity box and the message for the last rejected input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantityDraft {
    pub text: String,
    pub error: Option<String>,
}

impl QuantityDraft {
    pub fn new(quantity: u32) -> Self {
        Self {
            text: quantity.to_string(),
            error: None,
        }
    }

    /// Keep what the user typed; the quantity only when it is acceptable
    pub fn input(&mut self, text: &str) -> Option<u32> {
        self.text = text.to_string();
        match parse_quantity_input(text) {
            Ok(quantity) => {
                self.error = None;
                Some(quantity)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn increase(&mut self, current: u32) -> u32 {
        let next = increase_quantity(current);
        *self = Self::new(next);
        next
    }

    pub fn decrease(&mut self, current: u32) -> u32 {
        let next = decrease_quantity(current);
        *self = Self::new(next);
        next
    }

    /// Follow a quantity changed elsewhere, unless the box already shows it
    pub fn sync(&mut self, quantity: u32) {
        if parse_quantity_input(&self.text).ok() != Some(quantity) {
            *self = Self::new(quantity);
        }
    }
}

/// `−` / text box / `+`; reports every accepted quantity through `on_change`
#[component]
pub fn QuantityEditor(
    #[prop(into)] quantity: Signal<u32>,
    on_change: Callback<u32>,
) -> impl IntoView {
    let draft = RwSignal::new(QuantityDraft::new(quantity.get_untracked()));

    Effect::new(move |_| {
        let current = quantity.get();
        draft.update(|d| d.sync(current));
    });

    let step = move |up: bool| {
        let current = quantity.get_untracked();
        let mut next = current;
        draft.update(|d| {
            next = if up { d.increase(current) } else { d.decrease(current) };
        });
        if next != current {
            on_change.run(next);
        }
    };

    view! {
        <div class="quantity-editor">
            <Flex align=FlexAlign::Center gap=FlexGap::Small>
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| step(false)
                >
                    "−"
                </Button>
                <input
                    class="quantity-editor__input"
                    inputmode="numeric"
                    prop:value=move || draft.with(|d| d.text.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        let mut accepted = None;
                        draft.update(|d| accepted = d.input(&text));
                        if let Some(quantity) = accepted {
                            on_change.run(quantity);
                        }
                    }
                />
                <Button
                    size=ButtonSize::Small
                    appearance=ButtonAppearance::Subtle
                    on_click=move |_| step(true)
                >
                    "+"
                </Button>
            </Flex>
            {move || draft.with(|d| d.error.clone()).map(|e| view! {
                <span class="quantity-editor__error">{e}</span>
            })}
        </div>
    }
}
