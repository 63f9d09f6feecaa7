use std::{cell::RefCell, rc::Rc};

use anyhow::Result;
use leptos::{
    create_effect, create_memo, create_rw_signal, create_signal, html::Canvas, NodeRef, Params,
    Signal, SignalGet, SignalSet, SignalWith, WriteSignal,
};
use leptos_router::{use_navigate, use_params, NavigateOptions, Params};
use tracing::{error, info, warn};

use crate::{
    config::monitor_logs_url,
    datetime::display_time,
    request::get_json,
    session::use_session,
    task::{spawn_latest, use_task_slot},
    toast::use_toasts,
    use_canvas::{use_canvas, CanvasSize, UseCanvasReturn},
};

use super::{
    canvas::MonitorCanvas,
    series::{window_length, TimeSeries, WindowSummary, WindowedSeries},
    types::{MonitorLogs, MonitorLogsResponse},
};

pub struct CreateMonitorGraphReturn {
    pub canvas_node_ref: NodeRef<Canvas>,

    pub set_mouse_x: WriteSignal<Option<f64>>,
    pub set_refresh_count: WriteSignal<u64>,

    pub monitor_id: Signal<String>,
    pub is_loading: Signal<bool>,
    pub logs: Signal<MonitorLogs>,
    pub summary: Signal<WindowSummary>,
    pub canvas_backing_width: Signal<u32>,
    pub canvas_backing_height: Signal<u32>,
}

pub fn create_monitor_graph() -> CreateMonitorGraphReturn {
    let monitor_id = use_params_id();
    let session = use_session();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let slot = use_task_slot();

    let UseCanvasReturn {
        node_ref: canvas_node_ref,
        size: canvas_size,
    } = use_canvas();

    let (canvas, set_canvas) = create_signal::<Option<Rc<RefCell<MonitorCanvas>>>>(None);
    let (mouse_x, set_mouse_x) = create_signal::<Option<f64>>(None);
    let (refresh_count, set_refresh_count) = create_signal(0_u64);
    let (is_loading, set_loading) = create_signal(false);
    let logs = create_rw_signal(MonitorLogs::default());

    let current_session = session.session();
    create_effect(move |_| {
        if current_session.with(Option::is_none) {
            info!("no session, redirecting to login");
            navigate("/login", NavigateOptions::default());
        }
    });

    // Re-runs on mount, on id change and on refresh. Each run replaces the
    // previous fetch; a replaced fetch's result is dropped.
    create_effect(move |_| {
        refresh_count.track();
        let id = monitor_id.get();

        if id.is_empty() {
            warn!("monitor id missing from route");
            return;
        }

        let Some(bearer) = session.bearer() else {
            return;
        };

        set_loading.set(true);
        spawn_latest(
            &slot,
            fetch_monitor_logs(id.clone(), bearer),
            move |result| {
                match result {
                    Ok(monitor_logs) => {
                        info!(id, records = monitor_logs.records.len(), "monitor logs loaded");
                        logs.set(monitor_logs);
                    }
                    Err(err) => {
                        error!(id, "monitor logs request error: {err}");
                        toasts.error(format!("Couldn't load monitor logs: {err}"));
                        logs.set(MonitorLogs::default());
                    }
                }
                set_loading.set(false);
            },
        );
    });

    let windowed = create_memo(move |_| {
        logs.with(|logs| TimeSeries::from_records(&logs.records).window(window_length(), display_time))
    });

    let summary = create_memo(move |_| windowed.with(WindowedSeries::summary));

    create_effect(move |_| {
        let Some(node) = canvas_node_ref.get() else {
            return;
        };

        match MonitorCanvas::try_new(&node) {
            Ok(monitor_canvas) => set_canvas.set(Some(Rc::new(RefCell::new(monitor_canvas)))),
            Err(err) => error!("monitor canvas failed to initialize: {err}"),
        }
    });

    create_effect(move |_| {
        let size = canvas_size.get();

        let Some(canvas) = canvas.get() else {
            return;
        };

        windowed.with(|windowed| {
            canvas
                .borrow_mut()
                .render(windowed, window_length(), size, mouse_x.get());
        });
    });

    CreateMonitorGraphReturn {
        canvas_node_ref,

        set_mouse_x,
        set_refresh_count,

        monitor_id,
        is_loading: is_loading.into(),
        logs: logs.into(),
        summary: summary.into(),
        canvas_backing_width: Signal::derive(move || canvas_size.with(CanvasSize::backing_width)),
        canvas_backing_height: Signal::derive(move || canvas_size.with(CanvasSize::backing_height)),
    }
}

#[derive(Params, PartialEq)]
struct MonitorParams {
    id: Option<String>,
}

fn use_params_id() -> Signal<String> {
    let params = use_params::<MonitorParams>();
    let id = move || {
        params.with(|params| {
            params
                .as_ref()
                .ok()
                .and_then(|params| params.id.clone())
                .unwrap_or_default()
        })
    };
    id.into()
}

async fn fetch_monitor_logs(monitor_id: String, bearer: String) -> Result<MonitorLogs> {
    get_json::<MonitorLogsResponse>(&monitor_logs_url(&monitor_id)?, Some(&bearer))
        .await?
        .into_result()
}
