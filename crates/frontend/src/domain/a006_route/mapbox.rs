//! Mapbox GL JS bindings and the browser side of the route drawer.
//!
//! `mapboxgl` is loaded by `index.html`; only the handful of calls the
//! navigator needs are bound here.

use contracts::domain::a004_location::aggregate::Location;
use contracts::shared::geo::Bounds;
use contracts::shared::LngLat;
use leptos::prelude::{request_animation_frame_with_handle, AnimationFrameRequestHandle};
use serde::Serialize;
use serde_json::json;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::drawer::{FrameScheduler, RouteSurface};
use super::markers::{escape_html, location_style, WaypointMarker};
use crate::shared::config::MapConfig;

pub const ROUTE_SOURCE: &str = "route";
pub const ROUTE_LAYER: &str = "route";
pub const ROUTE_GLOW_LAYER: &str = "route-glow";
const ROUTE_COLOR: &str = "#00D4FF";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, catch)]
    fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, handler: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method)]
    fn remove(this: &Map);

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue);

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeSource)]
    fn remove_source(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = addSource)]
    fn add_source(this: &Map, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type GeoJSONSource;

    #[wasm_bindgen(method, js_name = setData)]
    fn set_data(this: &GeoJSONSource, data: &JsValue);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, position: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setPopup)]
    fn set_popup(this: &Marker, popup: &Popup) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_marker(this: &Marker);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    pub type Popup;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl)]
    fn new(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &Popup, html: &str) -> Popup;
}

/// Plain JS object from any serializable value (maps become objects, not `Map`s)
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or_else(|e| {
            log::error!("mapbox: failed to convert options: {}", e);
            JsValue::UNDEFINED
        })
}

fn line_feature(coordinates: &[LngLat]) -> serde_json::Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "LineString", "coordinates": coordinates },
        "properties": {},
    })
}

fn line_layer(id: &str, paint: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "type": "line",
        "source": ROUTE_SOURCE,
        "layout": { "line-join": "round", "line-cap": "round" },
        "paint": paint,
    })
}

/// A `div` for a custom marker
fn marker_element(class: &str, background: &str, html: &str) -> Option<web_sys::Element> {
    let document = web_sys::window()?.document()?;
    let element = document.create_element("div").ok()?;
    element.set_class_name(class);
    let _ = element.set_attribute("style", &format!("background: {};", background));
    element.set_inner_html(html);
    Some(element)
}

fn add_marker(map: &Map, element: web_sys::Element, position: LngLat, popup_html: &str) -> Marker {
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(&options, &"element".into(), &element);
    let popup = Popup::new(&to_js(&json!({ "offset": 25, "className": "step-popup" })));
    Marker::new(&options)
        .set_lng_lat(&to_js(&position))
        .set_popup(&popup.set_html(popup_html))
        .add_to(map)
}

struct SurfaceInner {
    map: Map,
    loaded: Cell<bool>,
    waypoints: RefCell<Vec<Marker>>,
    locations: RefCell<Vec<Marker>>,
    handlers: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

/// A live Mapbox map
#[derive(Clone)]
pub struct MapboxSurface {
    inner: Rc<SurfaceInner>,
}

impl MapboxSurface {
    /// Create the map inside `container`; `on_load` runs once the style is ready
    pub fn create(
        container: &web_sys::HtmlElement,
        config: &MapConfig,
        on_load: impl Fn() + 'static,
        on_error: impl Fn(String) + 'static,
    ) -> Result<Self, String> {
        if config.access_token.trim().is_empty() {
            return Err("Mapbox access token is required".to_string());
        }

        let options = to_js(&json!({
            "accessToken": config.access_token,
            "style": config.style,
            "center": config.center,
            "zoom": config.zoom,
            "maxBounds": config.max_bounds,
        }));
        let _ = js_sys::Reflect::set(&options, &"container".into(), container);
        let map = Map::new(&options)
            .map_err(|e| format!("Failed to initialize map: {}", js_error_message(&e)))?;

        let surface = Self {
            inner: Rc::new(SurfaceInner {
                map,
                loaded: Cell::new(false),
                waypoints: RefCell::new(Vec::new()),
                locations: RefCell::new(Vec::new()),
                handlers: RefCell::new(Vec::new()),
            }),
        };

        let loaded = Rc::downgrade(&surface.inner);
        let load_handler = Closure::<dyn FnMut(JsValue)>::new(move |_| {
            if let Some(inner) = loaded.upgrade() {
                inner.loaded.set(true);
            }
            log::info!("map loaded");
            on_load();
        });
        let error_handler = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let error = js_sys::Reflect::get(&event, &"error".into()).unwrap_or(JsValue::UNDEFINED);
            let message = format!("Map error: {}", js_error_message(&error));
            log::error!("{}", message);
            on_error(message);
        });
        surface.inner.map.on("load", &load_handler);
        surface.inner.map.on("error", &error_handler);
        surface
            .inner
            .handlers
            .borrow_mut()
            .extend([load_handler, error_handler]);

        Ok(surface)
    }

    /// Replace the location pins, coloured by location type
    pub fn show_locations(&self, locations: &[Location]) {
        let mut markers = self.inner.locations.borrow_mut();
        for marker in markers.drain(..) {
            marker.remove_marker();
        }
        for location in locations {
            let (color, icon) = location_style(&location.location_type);
            let Some(element) = marker_element("location-marker", color, icon) else {
                continue;
            };
            let popup = format!(
                r#"<div class="step-popup__body"><div class="step-popup__name">{}</div><div class="step-popup__name step-popup__name--my">{}</div></div>"#,
                escape_html(&location.english_name),
                escape_html(&location.burmese_name),
            );
            markers.push(add_marker(&self.inner.map, element, location.position(), &popup));
        }
        log::debug!("map: {} location markers", markers.len());
    }

    /// Tear down markers and the map itself
    pub fn destroy(&self) {
        self.clear_markers();
        for marker in self.inner.locations.borrow_mut().drain(..) {
            marker.remove_marker();
        }
        self.inner.loaded.set(false);
        self.inner.map.remove();
    }
}

fn js_error_message(value: &JsValue) -> String {
    js_sys::Reflect::get(value, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| value.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}

impl RouteSurface for MapboxSurface {
    fn is_ready(&self) -> bool {
        self.inner.loaded.get()
    }

    fn reset_route_layers(&self) {
        self.remove_route_layers();
        let map = &self.inner.map;
        map.add_source(
            ROUTE_SOURCE,
            &to_js(&json!({ "type": "geojson", "data": line_feature(&[]) })),
        );
        map.add_layer(&to_js(&line_layer(
            ROUTE_GLOW_LAYER,
            json!({
                "line-color": ROUTE_COLOR,
                "line-width": 8,
                "line-opacity": 0.4,
                "line-blur": 2,
            }),
        )));
        map.add_layer(&to_js(&line_layer(
            ROUTE_LAYER,
            json!({
                "line-color": ROUTE_COLOR,
                "line-width": 4,
                "line-opacity": 0.9,
            }),
        )));
    }

    fn remove_route_layers(&self) {
        let map = &self.inner.map;
        for layer in [ROUTE_GLOW_LAYER, ROUTE_LAYER] {
            if !map.get_layer(layer).is_undefined() {
                map.remove_layer(layer);
            }
        }
        if !map.get_source(ROUTE_SOURCE).is_undefined() {
            map.remove_source(ROUTE_SOURCE);
        }
    }

    fn set_route_data(&self, coordinates: &[LngLat]) {
        let source = self.inner.map.get_source(ROUTE_SOURCE);
        if source.is_undefined() || source.is_null() {
            return;
        }
        let data = json!({
            "type": "FeatureCollection",
            "features": [line_feature(coordinates)],
        });
        source.unchecked_into::<GeoJSONSource>().set_data(&to_js(&data));
    }

    fn replace_markers(&self, markers: &[WaypointMarker]) {
        self.clear_markers();
        let mut placed = self.inner.waypoints.borrow_mut();
        for marker in markers {
            let Some(element) = marker_element("route-marker", marker.color(), &marker.label()) else {
                continue;
            };
            placed.push(add_marker(&self.inner.map, element, marker.position, &marker.popup_html()));
        }
    }

    fn clear_markers(&self) {
        for marker in self.inner.waypoints.borrow_mut().drain(..) {
            marker.remove_marker();
        }
    }

    fn fit_bounds(&self, bounds: Bounds, padding: u32) {
        self.inner.map.fit_bounds(
            &to_js(&[bounds.south_west, bounds.north_east]),
            &to_js(&json!({ "padding": padding })),
        );
    }
}

/// `requestAnimationFrame` as a [`FrameScheduler`]
#[derive(Clone, Copy, Default)]
pub struct BrowserFrames;

impl FrameScheduler for BrowserFrames {
    type Handle = AnimationFrameRequestHandle;

    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Option<Self::Handle> {
        match request_animation_frame_with_handle(callback) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&self, handle: Self::Handle) {
        handle.cancel();
    }
}
