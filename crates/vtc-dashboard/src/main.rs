#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

const APP_NAME: &str = "VTC Admin";

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use vtc_client_core::{Client, FileTokenStorage};
    use vtc_dashboard::{background_worker, router::Route, VtcApp};
    use vtc_shared::const_config::client::CLIENT_TOKEN_STORAGE_KEY;

    let args = vtc_dashboard::cli::Cli::parse();

    if let Err(e) = vtc_dashboard::tracing::init(&args) {
        eprintln!("Failed to start tracing: {e}");
    }

    let rt = background_worker::create_runtime()?;
    let _enter = rt.enter(); // This Guard must be held to call `tokio::spawn` anywhere in the program
    background_worker::start_background_worker(rt); // This is also needed to prevent the runtime from stopping

    let token_file = args.token_file.clone().unwrap_or_else(|| {
        eframe::storage_dir("vtc-dashboard")
            .unwrap_or_default()
            .join(CLIENT_TOKEN_STORAGE_KEY)
    });
    tracing::info!(?token_file, api_base_url = %args.api_base_url, "starting dashboard");
    let client = Client::new(args.api_base_url.clone(), FileTokenStorage::new(token_file));
    let initial_route = Route::parse(&args.route);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(VtcApp::new(cc, client, initial_route)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the dashboard: {e}"))
}

// When compiling to web using trunk
#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;
    use vtc_client_core::{Client, LocalTokenStorage};
    use vtc_dashboard::{router::Route, VtcApp};
    use vtc_shared::const_config::client::CLIENT_DEFAULT_API_BASE_URL;

    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(vtc_dashboard::wasm_log_level()).ok();

    let web_options = eframe::WebOptions::default();
    let api_base_url = option_env!("VTC_API_BASE_URL").unwrap_or(CLIENT_DEFAULT_API_BASE_URL);
    let client = Client::new(api_base_url, LocalTokenStorage);

    wasm_bindgen_futures::spawn_local(async move {
        let document = web_sys::window()
            .expect("No window found")
            .document()
            .expect("No document found (No DOM)");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        // The real route is read from the address bar on the first frame
        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(move |cc| Ok(Box::new(VtcApp::new(cc, client, Route::Home)))),
            )
            .await;

        // Remove the loading text and spinner:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p> The app has crashed. See the developer console for details. </p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}
