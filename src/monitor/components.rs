use humantime::format_duration;
use leptos::html::Canvas as CanvasNode;
use leptos::{
    component, ev::MouseEvent, view, IntoView, NodeRef, Signal, SignalGet, SignalSet,
    SignalUpdate, SignalWith,
};

use crate::components::Spinner;

use super::create_monitor_graph::{create_monitor_graph, CreateMonitorGraphReturn};
use super::series::{window_length, WindowSummary, WINDOW_HOURS};
use super::types::MonitorLogs;

#[component]
pub fn ViewGraph() -> impl IntoView {
    let CreateMonitorGraphReturn {
        canvas_node_ref,

        set_mouse_x,
        set_refresh_count,

        monitor_id,
        is_loading,
        logs,
        summary,
        canvas_backing_width,
        canvas_backing_height,
    } = create_monitor_graph();

    let handle_mousemove = move |evt: MouseEvent| {
        let Some(canvas_node) = canvas_node_ref.get() else {
            return;
        };

        let dom_rect = canvas_node.get_bounding_client_rect();
        set_mouse_x.set(Some(f64::from(evt.client_x()) - dom_rect.left()));
    };

    view! {
        <div class="w-full p-4 flex flex-col">
            <header class="flex justify-between items-center">
                <hgroup>
                    <h2>"Monitor " {move || monitor_id.get()}</h2>
                    <p>"Response time over the last " {window_label()}</p>
                </hgroup>
                <button
                    class="outline"
                    disabled=move || is_loading.get()
                    on:click=move |_| set_refresh_count.update(|count| *count += 1)
                >
                    "Refresh"
                </button>
            </header>

            <Summary logs summary></Summary>

            <div
                class="w-full relative"
                on:mousemove=handle_mousemove
                on:mouseleave=move |_| set_mouse_x.set(None)
            >
                <div
                    class="w-full h-full flex justify-center items-center"
                    class:hidden=move || !is_loading.get()
                >
                    <Spinner />
                </div>

                <Canvas
                    canvas_node_ref
                    backing_width=canvas_backing_width
                    backing_height=canvas_backing_height
                    is_loading
                ></Canvas>
            </div>
        </div>
    }
}

#[component]
fn Summary(logs: Signal<MonitorLogs>, summary: Signal<WindowSummary>) -> impl IntoView {
    view! {
        <div class="grid">
            <article>
                <small>"Avg. response time"</small>
                <p>{move || logs.with(|logs| format_ms(logs.average_response_time))}</p>
            </article>
            <article>
                <small>"Avg. response time while up"</small>
                <p>{move || logs.with(|logs| format_ms(logs.average_response_up_time))}</p>
            </article>
            <article>
                <small>"Checks in window"</small>
                <p>{move || summary.with(|summary| summary.samples)}</p>
            </article>
            <article>
                <small>"Failed checks"</small>
                <p>{move || summary.with(|summary| summary.down)}</p>
            </article>
        </div>
    }
}

#[component]
fn Canvas(
    canvas_node_ref: NodeRef<CanvasNode>,
    backing_width: Signal<u32>,
    backing_height: Signal<u32>,
    is_loading: Signal<bool>,
) -> impl IntoView {
    view! {
        <canvas
            class="border border-black w-full h-full"
            class:hidden=move || is_loading.get()
            node_ref=canvas_node_ref
            width=backing_width
            height=backing_height
            style:width="100%"
            style:height="480px"
        />
    }
}

fn window_label() -> String {
    window_length().to_std().map_or_else(
        |_| format!("{WINDOW_HOURS}h"),
        |window| format_duration(window).to_string(),
    )
}

fn format_ms(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| format!("{value:.0} ms"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_label_is_human_readable() {
        assert_eq!(window_label(), "1day");
    }

    #[test]
    fn averages_fall_back_when_missing() {
        assert_eq!(format_ms(Some(182.46)), "182 ms");
        assert_eq!(format_ms(None), "n/a");
    }
}
