//! The analysis workflow panel: capture box, countdown, report preview,
//! and the PDF download.
//!
//! Every piece of async work — countdown ticks, the capture trigger, the
//! image poll, the analysis delay — is a spawned future that posts an
//! event (stamped with its run id) back into one coroutine. The engine
//! discards anything stamped with a stale id, and the poll loop also
//! watches a cancel token so a reset stops it mid-flight.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;

use api::{ApiClient, CancelToken, PollOptions, PollOutcome};

use crate::core::{format, platform, timing};
use crate::report::{
    self, DistributionChart, DownloadGate, DownloadStatus, ReportData,
};

use super::engine::{AnalysisEngine, Phase, TickOutcome};
use super::simulate::simulate;

type EventSlot = Rc<RefCell<Option<UnboundedSender<WorkflowEvent>>>>;

#[derive(Debug, Clone)]
enum WorkflowEvent {
    Start,
    Reset,
    Tick { run_id: u64 },
    CaptureFailed { run_id: u64, message: String },
    PollSettled { run_id: u64, outcome: PollOutcome },
    AnalysisReady { run_id: u64 },
    Download,
    DownloadSettled,
}

#[component]
pub fn AnalysisView() -> Element {
    let engine = use_signal(AnalysisEngine::default);
    let download = use_signal(DownloadGate::default);
    let download_message = use_signal(|| Option::<String>::None);
    let poll_cancel = use_signal(|| Option::<CancelToken>::None);

    let client = use_context::<ApiClient>();

    // The countdown and the poll loop share the workflow lifecycle: both
    // die on reset, and the poller also dies with the component.
    use_drop(move || {
        if let Some(token) = poll_cancel.peek().clone() {
            token.cancel();
        }
    });

    let sender_slot: EventSlot = Rc::new(RefCell::new(None));
    let sender_slot_for_loop = sender_slot.clone();

    let coroutine = {
        let client = client.clone();
        let engine_ref = engine;
        let download_ref = download;
        let message_ref = download_message;

        use_coroutine(move |mut rx: UnboundedReceiver<WorkflowEvent>| {
            let sender_slot = sender_slot_for_loop.clone();
            let client = client.clone();
            let mut engine_signal = engine_ref;
            let mut download_signal = download_ref;
            let mut message_signal = message_ref;
            let mut cancel_slot = poll_cancel;

            async move {
                while let Some(event) = rx.next().await {
                    match event {
                        WorkflowEvent::Start => {
                            let started = engine_signal
                                .with_mut(|eng| eng.start().map(|run| (run, eng.config.clone())));
                            let Some((run_id, config)) = started else {
                                continue;
                            };

                            message_signal.set(None);
                            download_signal.set(DownloadGate::default());

                            let stale = cancel_slot.peek().clone();
                            if let Some(token) = stale {
                                token.cancel();
                            }
                            let cancel = CancelToken::new();
                            cancel_slot.set(Some(cancel.clone()));

                            // Trigger and poll run concurrently; neither
                            // blocks the countdown.
                            spawn_capture(sender_slot.clone(), client.clone(), run_id);
                            spawn_poll(
                                sender_slot.clone(),
                                client.clone(),
                                run_id,
                                PollOptions {
                                    timeout_ms: config.poll_timeout_ms,
                                    interval_ms: config.poll_interval_ms,
                                },
                                cancel,
                            );
                            queue_tick(sender_slot.clone(), run_id);
                        }
                        WorkflowEvent::Reset => {
                            let active = cancel_slot.peek().clone();
                            if let Some(token) = active {
                                token.cancel();
                            }
                            cancel_slot.set(None);
                            engine_signal.with_mut(|eng| eng.reset());
                            download_signal.set(DownloadGate::default());
                            message_signal.set(None);
                        }
                        WorkflowEvent::Tick { run_id } => {
                            match engine_signal.with_mut(|eng| eng.tick(run_id)) {
                                TickOutcome::Continue => {
                                    queue_tick(sender_slot.clone(), run_id);
                                }
                                TickOutcome::AnalysisScheduled => {
                                    let delay = engine_signal
                                        .with(|eng| eng.config.analysis_delay_ms);
                                    queue_analysis(sender_slot.clone(), run_id, delay);
                                }
                                TickOutcome::Ignored => {}
                            }
                        }
                        WorkflowEvent::CaptureFailed { run_id, message } => {
                            engine_signal.with_mut(|eng| eng.record_error(run_id, message));
                        }
                        WorkflowEvent::PollSettled { run_id, outcome } => {
                            engine_signal.with_mut(|eng| {
                                if let Some(locator) = outcome.image {
                                    eng.set_sample_image(run_id, locator);
                                } else if !outcome.cancelled {
                                    if let Some(message) = outcome.last_error {
                                        eng.record_error(run_id, message);
                                    }
                                }
                            });
                        }
                        WorkflowEvent::AnalysisReady { run_id } => {
                            let record = simulate(timing::minute_seed());
                            engine_signal.with_mut(|eng| eng.finish_analysis(run_id, record));
                        }
                        WorkflowEvent::Download => {
                            let (phase, result, sample) = engine_signal.with(|eng| {
                                (eng.phase, eng.result.clone(), eng.sample_image.clone())
                            });
                            if phase != Phase::Results {
                                continue;
                            }
                            let Some(result) = result else { continue };
                            if !download_signal.with_mut(|gate| gate.begin()) {
                                continue;
                            }
                            message_signal.set(None);

                            // A sample that cannot be fetched just drops
                            // the image block from the document.
                            let image_bytes = match sample.as_deref() {
                                Some(locator) => client.fetch_image_bytes(locator).await.ok(),
                                None => None,
                            };

                            let generated_at = timing::now_utc();
                            let delivered = report::compose(
                                image_bytes.as_deref(),
                                &ReportData::from(&result),
                                generated_at,
                            )
                            .and_then(|bytes| {
                                report::deliver_report(
                                    &report::report_filename(generated_at),
                                    &bytes,
                                )
                            });

                            match delivered {
                                Ok(saved) => {
                                    download_signal.with_mut(|gate| gate.complete());
                                    message_signal.set(Some(match saved {
                                        Some(path) => format!("Report saved to {path}"),
                                        None => "Report download started".to_string(),
                                    }));
                                    queue_settle(sender_slot.clone());
                                }
                                Err(err) => {
                                    download_signal.with_mut(|gate| gate.abort());
                                    message_signal.set(Some(format!("Report failed: {err}")));
                                }
                            }
                        }
                        WorkflowEvent::DownloadSettled => {
                            download_signal.with_mut(|gate| gate.settle());
                        }
                    }
                }
            }
        })
    };

    sender_slot.borrow_mut().replace(coroutine.tx());

    let send_event = move |event: WorkflowEvent| {
        coroutine.send(event);
    };

    let snapshot = engine();
    let analyzing = snapshot.phase == Phase::Analyzing;
    let gate = download();
    let message = download_message();

    let field = |value: Option<String>| {
        if analyzing {
            "Analyzing...".to_string()
        } else {
            format::display_or_dash(value.as_deref())
        }
    };
    let result = snapshot.result.as_ref();
    let rows = [
        ("Microplastic Count:", field(result.map(|r| r.particle_count.clone()))),
        ("Average Size:", field(result.map(|r| r.avg_size.clone()))),
        (
            "Contamination Level:",
            field(result.map(|r| r.contamination_level.label().to_string())),
        ),
        ("Dominant Polymer:", field(result.map(|r| r.polymer_type.clone()))),
    ];

    let risk_value: Element = if analyzing {
        rsx! { "Analyzing..." }
    } else {
        match result.map(|r| r.risk_level) {
            Some(risk) => rsx! {
                span { class: "{risk.css_class()}", "{risk.label()}" }
            },
            None => rsx! { "-" },
        }
    };

    let download_label = match gate.status() {
        DownloadStatus::Idle => "Download Report",
        DownloadStatus::Downloading => "Generating...",
        DownloadStatus::Downloaded => "Complete!",
    };

    rsx! {
        div { class: "analysis-section",
            div { class: "camera-box",
                h3 { "Capture Sample" }
                div { class: "camera-area",
                    match snapshot.phase {
                        Phase::Idle => rsx! {
                            p { "Click the button below to start the research process." }
                            button {
                                r#type: "button",
                                class: "btn-start-research",
                                onclick: move |_| send_event(WorkflowEvent::Start),
                                "Start Research"
                            }
                        },
                        Phase::Countdown => rsx! {
                            div { class: "countdown",
                                "Research in progress... {snapshot.countdown_remaining} seconds remaining"
                            }
                        },
                        Phase::Analyzing | Phase::Results => rsx! {
                            div { class: "image-preview",
                                if let Some(src) = snapshot.sample_image.as_ref() {
                                    img { src: "{src}", alt: "Captured sample" }
                                } else {
                                    div { class: "image-placeholder", "Awaiting sensor image" }
                                }
                                div { class: "countdown",
                                    if analyzing {
                                        "Sample captured! Generating report..."
                                    } else {
                                        "Analysis complete!"
                                    }
                                }
                            }
                        },
                    }
                }
                if snapshot.phase != Phase::Idle {
                    button {
                        r#type: "button",
                        class: "btn-reset",
                        onclick: move |_| send_event(WorkflowEvent::Reset),
                        "Reset"
                    }
                }
            }

            div { class: "report-box",
                h3 { "Analysis Report" }
                p { "Detailed analysis of your water sample." }

                div { class: "report-content",
                    for (label, value) in rows {
                        div { class: "result-item",
                            span { class: "result-label", "{label}" }
                            span { class: "result-value", "{value}" }
                        }
                    }
                    div { class: "result-item",
                        span { class: "result-label", "Risk Assessment:" }
                        span { class: "result-value", {risk_value} }
                    }

                    if let Some(distribution) = result.map(|r| r.distribution) {
                        DistributionChart { distribution }
                    }
                }

                if snapshot.phase == Phase::Results {
                    div { class: "action-buttons",
                        button {
                            r#type: "button",
                            class: "btn-download",
                            disabled: gate.status() != DownloadStatus::Idle,
                            onclick: move |_| send_event(WorkflowEvent::Download),
                            "{download_label}"
                        }
                    }
                }

                if let Some(text) = message {
                    p { class: "report-feedback", "{text}" }
                }
                if let Some(err) = snapshot.last_error.as_ref() {
                    div { class: "report-error", "⚠️ {err}" }
                }
            }
        }
    }
}

fn queue_tick(sender_slot: EventSlot, run_id: u64) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(1_000).await;
            let _ = sender.unbounded_send(WorkflowEvent::Tick { run_id });
        });
    }
}

fn queue_analysis(sender_slot: EventSlot, run_id: u64, delay_ms: u64) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(delay_ms).await;
            let _ = sender.unbounded_send(WorkflowEvent::AnalysisReady { run_id });
        });
    }
}

fn queue_settle(sender_slot: EventSlot) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(report::SETTLE_DELAY_MS).await;
            let _ = sender.unbounded_send(WorkflowEvent::DownloadSettled);
        });
    }
}

fn spawn_capture(sender_slot: EventSlot, client: ApiClient, run_id: u64) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            if let Err(err) = client.trigger_capture().await {
                let _ = sender.unbounded_send(WorkflowEvent::CaptureFailed {
                    run_id,
                    message: err.to_string(),
                });
            }
        });
    }
}

fn spawn_poll(
    sender_slot: EventSlot,
    client: ApiClient,
    run_id: u64,
    opts: PollOptions,
    cancel: CancelToken,
) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            let outcome = client.poll_for_image(&opts, &cancel).await;
            let _ = sender.unbounded_send(WorkflowEvent::PollSettled { run_id, outcome });
        });
    }
}
