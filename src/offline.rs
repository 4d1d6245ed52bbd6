//! Offline support: the static asset manifest plus the service-worker side
//! (pre-cache on install, claim on activate, cache-first fetch).
//!
//! The page calls `register_offline_worker("./sw.js")`; `www/sw.js` loads this
//! crate's wasm and forwards the worker lifecycle events to the `offline_*`
//! handlers below.

use js_sys::{Array, Promise};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Cache, CacheStorage, Request, ServiceWorkerGlobalScope, window};

/// Bump when any asset changes so old caches stop being served.
pub const CACHE_NAME: &str = "ninja-runner-v1";

pub const JUMP_SOUND: &str = "./jump.mp3";
pub const GAME_OVER_SOUND: &str = "./gameover.mp3";
pub const MUSIC: &str = "./music.mp3";

pub const ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./pkg/ninja_runner.js",
    "./pkg/ninja_runner_bg.wasm",
    "./manifest.json",
    "./icon-192.png",
    "./icon-512.png",
    JUMP_SOUND,
    GAME_OVER_SOUND,
    MUSIC,
];

#[derive(Serialize)]
struct Manifest<'a> {
    cache: &'a str,
    assets: &'a [&'a str],
}

pub fn manifest_json() -> String {
    let manifest = Manifest {
        cache: CACHE_NAME,
        assets: ASSETS,
    };
    // Serializing string slices cannot fail.
    serde_json::to_string(&manifest).unwrap_or_default()
}

/// Whether a request path (relative to the app root) is part of the pre-cache.
pub fn is_precached(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let normalized = if path.starts_with("./") {
        path.to_string()
    } else {
        format!("./{}", path.trim_start_matches('/'))
    };
    ASSETS.contains(&normalized.as_str())
}

/// Path of `request_url` below the directory the worker script is served from.
fn app_relative<'a>(request_url: &'a str, worker_url: &str) -> Option<&'a str> {
    let root = &worker_url[..worker_url.rfind('/')? + 1];
    request_url.strip_prefix(root)
}

// --- Page side ---------------------------------------------------------------

#[wasm_bindgen]
pub fn asset_manifest() -> String {
    manifest_json()
}

/// Register the offline worker. Unsupported browsers and registration failures
/// only log; the game works online either way.
#[wasm_bindgen]
pub fn register_offline_worker(script_url: &str) {
    let Some(win) = window() else { return };
    let container = win.navigator().service_worker();
    let url = script_url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(container.register(&url)).await {
            Ok(_) => log::info!("offline worker registered ({url})"),
            Err(e) => log::warn!("offline worker registration failed: {e:?}"),
        }
    });
}

// --- Worker side -------------------------------------------------------------
//
// Service workers must attach their listeners synchronously while the script
// is first evaluated, before wasm has loaded. The worker bootstrap therefore
// owns the listeners and forwards each event here once the module is ready:
// `e.waitUntil(ready.then(() => offline_install()))` and so on.

fn worker_scope() -> Result<ServiceWorkerGlobalScope, JsValue> {
    js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| JsValue::from_str("not running in a service worker"))
}

/// `install`: activate immediately and pre-cache every asset.
#[wasm_bindgen]
pub fn offline_install() -> Result<Promise, JsValue> {
    let scope = worker_scope()?;
    if let Err(e) = scope.skip_waiting() {
        log::warn!("skipWaiting failed: {e:?}");
    }
    let caches = scope.caches()?;
    Ok(future_to_promise(precache(caches)))
}

/// `activate`: take control of already open pages.
#[wasm_bindgen]
pub fn offline_activate() -> Result<Promise, JsValue> {
    Ok(worker_scope()?.clients().claim())
}

/// `fetch`: answer from the cache, falling back to the network.
#[wasm_bindgen]
pub fn offline_fetch(request: Request) -> Result<Promise, JsValue> {
    let scope = worker_scope()?;
    Ok(future_to_promise(cache_first(scope, request)))
}

async fn precache(caches: CacheStorage) -> Result<JsValue, JsValue> {
    let cache: Cache = JsFuture::from(caches.open(CACHE_NAME)).await?.dyn_into()?;
    let assets: Array = ASSETS.iter().map(|a| JsValue::from_str(a)).collect();
    JsFuture::from(cache.add_all_with_str_sequence(&assets)).await?;
    log::info!("pre-cached {} assets into {CACHE_NAME}", ASSETS.len());
    Ok(JsValue::UNDEFINED)
}

async fn cache_first(scope: ServiceWorkerGlobalScope, request: Request) -> Result<JsValue, JsValue> {
    let caches = scope.caches()?;
    let hit = JsFuture::from(caches.match_with_request(&request)).await?;
    if !hit.is_undefined() && !hit.is_null() {
        return Ok(hit);
    }
    let url = request.url();
    let worker_url = scope.location().href();
    if app_relative(&url, &worker_url).is_some_and(is_precached) {
        log::warn!("pre-cached asset missing from {CACHE_NAME}: {url}");
    } else {
        log::debug!("cache miss: {url}");
    }
    JsFuture::from(scope.fetch_with_request(&request)).await
}
