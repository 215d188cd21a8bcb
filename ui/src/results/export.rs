use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::capture::{
    AnimatedExporter, CaptureError, CaptureRegion, Document, ExportArtifact, ExportError,
    ExportLease, GifFrameEncoder, Raster, SnapshotRenderer, SvgRasterizer,
};
use crate::core::config::ExportSettings;
use crate::results::export_filename;
use crate::session::use_quiz_session;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working(&'static str),
    Done(String),
    Error(String),
}

#[component]
pub fn ResultExportPanel(document: Signal<Document>, tag: String) -> Element {
    let session = use_quiz_session();
    let settings: &'static ExportSettings = &session.settings.export;

    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match &status() {
        ExportStatus::Idle => None,
        ExportStatus::Working(label) => Some(("result-export__meta".to_string(), format!("{label}…"))),
        ExportStatus::Done(message) => Some((
            "result-export__meta result-export__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "result-export__meta result-export__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let png_handler = {
        let session_id = session.id.clone();
        let lock = session.export_lock.clone();
        let tag = tag.clone();
        let mut document = document;
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let lease = match lock.try_acquire(&settings.region_id) {
                Ok(lease) => lease,
                Err(err) => {
                    status_signal.set(ExportStatus::Error(err.to_string()));
                    return;
                }
            };
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("Preparing image"));

            let outcome = document.with_mut(|doc| png_artifact(doc, settings, &tag));
            drop(lease);
            let session_id = session_id.clone();
            spawn(async move {
                let outcome = match outcome {
                    Ok(artifact) => deliver(artifact).await,
                    Err(err) => Err(err),
                };
                match outcome {
                    Ok(message) => {
                        tracing::info!(session = %session_id, %message, "export delivered");
                        status_signal.set(ExportStatus::Done(message));
                    }
                    Err(err) => {
                        tracing::warn!(session = %session_id, error = %err, "export failed");
                        status_signal.set(ExportStatus::Error(err.to_string()));
                    }
                }
                busy_signal.set(false);
            });
        }
    };

    let gif_handler = {
        let session_id = session.id.clone();
        let lock = session.export_lock.clone();
        let tag = tag.clone();
        let mut document = document;
        let mut status_signal = status;
        let mut busy_signal = busy;
        move |_| {
            if busy_signal() {
                return;
            }
            let exporter = AnimatedExporter::new(settings, lock.clone());
            let lease = match exporter.try_begin(&settings.region_id) {
                Ok(lease) => lease,
                Err(err) => {
                    status_signal.set(ExportStatus::Error(err.to_string()));
                    return;
                }
            };
            busy_signal.set(true);
            status_signal.set(ExportStatus::Working("Animating snowfall"));

            let raster = document.with_mut(|doc| capture_card(doc, settings, settings.animated_scale));
            let tag = tag.clone();
            let session_id = session_id.clone();
            spawn(async move {
                let outcome = match raster {
                    Ok(raster) => match gif_artifact(&exporter, lease, &raster, &tag).await {
                        Ok(artifact) => deliver(artifact).await,
                        Err(err) => Err(err),
                    },
                    Err(err) => Err(err.into()),
                };
                match outcome {
                    Ok(message) => {
                        tracing::info!(session = %session_id, %message, "export delivered");
                        status_signal.set(ExportStatus::Done(message));
                    }
                    Err(err) => {
                        tracing::warn!(session = %session_id, error = %err, "export failed");
                        status_signal.set(ExportStatus::Error(err.to_string()));
                    }
                }
                busy_signal.set(false);
            });
        }
    };

    rsx! {
        section { class: "result-export",
            div { class: "result-export__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: png_handler,
                    "Save image"
                }
                button {
                    r#type: "button",
                    class: "button button--accent",
                    disabled: busy(),
                    onclick: gif_handler,
                    "Save snowy GIF"
                }
            }

            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

fn card_region(settings: &ExportSettings) -> CaptureRegion {
    CaptureRegion::new(settings.region_id.clone(), settings.suppress_ids.iter().cloned())
}

/// Still capture of the card with transient controls hidden.
pub fn capture_card(
    document: &mut Document,
    settings: &ExportSettings,
    scale: f32,
) -> Result<Raster, CaptureError> {
    let renderer = SnapshotRenderer::new(SvgRasterizer::new(Some(&settings.background)), scale);
    renderer.capture(document, &card_region(settings))
}

pub fn png_artifact(
    document: &mut Document,
    settings: &ExportSettings,
    tag: &str,
) -> Result<ExportArtifact, ExportError> {
    let raster = capture_card(document, settings, settings.static_scale)?;
    let artifact = ExportArtifact {
        filename: export_filename(tag, "png", OffsetDateTime::now_utc()),
        mime: "image/png",
        bytes: raster.to_png()?,
    };
    tracing::info!(filename = %artifact.filename, bytes = artifact.bytes.len(), "image export ready");
    Ok(artifact)
}

pub async fn gif_artifact(
    exporter: &AnimatedExporter,
    lease: ExportLease,
    raster: &Raster,
    tag: &str,
) -> Result<ExportArtifact, ExportError> {
    let bytes = exporter
        .build(lease, raster, GifFrameEncoder::new()?)
        .await?;
    Ok(ExportArtifact {
        filename: export_filename(tag, "gif", OffsetDateTime::now_utc()),
        mime: "image/gif",
        bytes,
    })
}

/// Hands the artifact to the user and describes where it went.
async fn deliver(artifact: ExportArtifact) -> Result<String, ExportError> {
    match download_bytes(&artifact.filename, artifact.mime, artifact.bytes).await {
        Ok(Some(path)) => Ok(format!("Saved to {path}")),
        Ok(None) => Ok(format!("Downloading {}", artifact.filename)),
        Err(err) => Err(ExportError::Delivery(err)),
    }
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let _ = mime;
        let dir = desktop_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        fs::write(&path, &bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "Yuletype", "Yuletype")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;
    use crate::capture::{Display, ExportLock, Motion};
    use crate::core::content::ContentBank;
    use crate::results::{build_result_card, CARD_REGION_ID, MUSIC_CONTROLLER_ID};

    fn card() -> Document {
        let bank = ContentBank::embedded().unwrap();
        build_result_card(bank.result("host").unwrap(), Some(42))
    }

    fn small_settings() -> ExportSettings {
        ExportSettings {
            static_scale: 0.5,
            animated_scale: 0.25,
            duration_secs: 1,
            fps: 3,
            snowflakes: 10,
            ..ExportSettings::default()
        }
    }

    #[test]
    fn png_export_restores_the_card() {
        let mut doc = card();
        let before = doc.clone();

        let artifact = png_artifact(&mut doc, &small_settings(), "host").unwrap();

        assert_eq!(artifact.mime, "image/png");
        assert!(artifact.filename.starts_with("yuletype-host-"));
        assert!(artifact.filename.ends_with(".png"));
        assert_eq!(&artifact.bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(doc, before);
        assert_eq!(
            doc.find(MUSIC_CONTROLLER_ID).unwrap().display,
            Display::Shown
        );
        assert_eq!(
            doc.find(CARD_REGION_ID).unwrap().motion,
            Motion::entering("slide-up", 30.0)
        );
    }

    #[test]
    fn capture_of_missing_region_fails_cleanly() {
        let mut doc = card();
        let settings = ExportSettings {
            region_id: "not-here".into(),
            ..small_settings()
        };
        let err = png_artifact(&mut doc, &settings, "host").unwrap_err();
        assert_eq!(
            err,
            ExportError::Capture(CaptureError::RegionNotFound("not-here".into()))
        );
    }

    #[tokio::test]
    async fn gif_export_produces_named_animation() {
        let settings = small_settings();
        let exporter = AnimatedExporter::new(&settings, ExportLock::new());
        let lease = exporter.try_begin(&settings.region_id).unwrap();
        let raster = capture_card(&mut card(), &settings, settings.animated_scale).unwrap();

        let artifact = gif_artifact(&exporter, lease, &raster, "host").await.unwrap();

        assert_eq!(artifact.mime, "image/gif");
        assert!(artifact.filename.ends_with(".gif"));
        assert_eq!(&artifact.bytes[..6], b"GIF89a");
    }

    #[tokio::test]
    async fn abandoning_a_gif_export_frees_the_region() {
        let settings = small_settings();
        let lock = ExportLock::new();
        let exporter = AnimatedExporter::new(&settings, lock.clone());
        let lease = exporter.try_begin(&settings.region_id).unwrap();
        let raster = capture_card(&mut card(), &settings, settings.animated_scale).unwrap();

        let mut export = Box::pin(gif_artifact(&exporter, lease, &raster, "host"));
        assert!((&mut export).now_or_never().is_none());
        assert!(lock.is_busy(&settings.region_id));

        drop(export);
        assert!(!lock.is_busy(&settings.region_id));
    }
}
