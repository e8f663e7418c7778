use std::path::Path;

use eframe::egui::load::{SizeHint, TexturePoll};
use eframe::egui::{Color32, Context, TextureId, TextureOptions};
use log::warn;

use crate::catalog::NodeKind;

use super::super::render_utils::kind_color;

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum TextureStatus {
    Pending,
    Ready(TextureId),
    Failed(String),
}

/// Anything that can turn a URI into a texture over time.
pub(in crate::app) trait TextureSource {
    fn poll(&mut self, uri: &str) -> TextureStatus;
}

/// Loads through egui's installed image loaders.
pub(in crate::app) struct EguiTextures<'a> {
    pub(in crate::app) ctx: &'a Context,
}

impl TextureSource for EguiTextures<'_> {
    fn poll(&mut self, uri: &str) -> TextureStatus {
        match self
            .ctx
            .try_load_texture(uri, TextureOptions::LINEAR, SizeHint::default())
        {
            Ok(TexturePoll::Pending { .. }) => TextureStatus::Pending,
            Ok(TexturePoll::Ready { texture }) => TextureStatus::Ready(texture.id),
            Err(error) => TextureStatus::Failed(error.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) enum TextureSlot {
    Absent,
    Pending { uri: String },
    Ready { id: TextureId },
    Failed,
}

/// What a sphere is painted with this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum SurfaceFill {
    Textured(TextureId),
    Flat(Color32),
}

impl TextureSlot {
    pub(in crate::app) fn new(assets_root: &Path, img: Option<&str>) -> Self {
        match img.map(str::trim).filter(|img| !img.is_empty()) {
            Some(img) => Self::Pending {
                uri: asset_uri(assets_root, img),
            },
            None => Self::Absent,
        }
    }

    /// Polls the source while pending. A failure is logged once and the slot
    /// stays on the fallback for good.
    pub(in crate::app) fn resolve(&mut self, source: &mut dyn TextureSource, node_id: &str) {
        let Self::Pending { uri } = self else {
            return;
        };

        match source.poll(uri) {
            TextureStatus::Pending => {}
            TextureStatus::Ready(id) => *self = Self::Ready { id },
            TextureStatus::Failed(reason) => {
                warn!("texture for {node_id} ({uri}) failed, using flat material: {reason}");
                *self = Self::Failed;
            }
        }
    }

    pub(in crate::app) fn fill(&self, kind: NodeKind) -> SurfaceFill {
        match self {
            Self::Ready { id } => SurfaceFill::Textured(*id),
            _ => SurfaceFill::Flat(kind_color(kind)),
        }
    }
}

pub(in crate::app) fn asset_uri(assets_root: &Path, img: &str) -> String {
    let relative = img.trim_start_matches('/');
    format!("file://{}", assets_root.join(relative).display())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct FakeSource {
        answers: HashMap<String, Vec<TextureStatus>>,
        polls: usize,
    }

    impl FakeSource {
        fn answer(mut self, uri: &str, statuses: Vec<TextureStatus>) -> Self {
            self.answers.insert(uri.to_owned(), statuses);
            self
        }
    }

    impl TextureSource for FakeSource {
        fn poll(&mut self, uri: &str) -> TextureStatus {
            self.polls += 1;
            match self.answers.get_mut(uri) {
                Some(statuses) if statuses.len() > 1 => statuses.remove(0),
                Some(statuses) => statuses
                    .first()
                    .cloned()
                    .unwrap_or(TextureStatus::Pending),
                None => TextureStatus::Failed("not found".to_owned()),
            }
        }
    }

    #[test]
    fn uri_is_rooted_at_assets() {
        assert_eq!(
            asset_uri(Path::new("/srv/public"), "/images/cod.jpg"),
            "file:///srv/public/images/cod.jpg"
        );
        assert_eq!(TextureSlot::new(Path::new("public"), None), TextureSlot::Absent);
        assert_eq!(
            TextureSlot::new(Path::new("public"), Some("  ")),
            TextureSlot::Absent
        );
    }

    #[test]
    fn pending_and_absent_render_flat_color() {
        let pending = TextureSlot::new(Path::new("public"), Some("/a.png"));
        assert_eq!(
            pending.fill(NodeKind::Data),
            SurfaceFill::Flat(kind_color(NodeKind::Data))
        );
        assert_eq!(
            TextureSlot::Absent.fill(NodeKind::Signal),
            SurfaceFill::Flat(kind_color(NodeKind::Signal))
        );
    }

    #[test]
    fn ready_texture_replaces_fallback() {
        let mut slot = TextureSlot::new(Path::new("/p"), Some("a.png"));
        let mut source = FakeSource::default().answer(
            "file:///p/a.png",
            vec![
                TextureStatus::Pending,
                TextureStatus::Ready(TextureId::User(3)),
            ],
        );

        slot.resolve(&mut source, "a");
        assert!(matches!(slot, TextureSlot::Pending { .. }));
        slot.resolve(&mut source, "a");
        assert_eq!(
            slot.fill(NodeKind::System),
            SurfaceFill::Textured(TextureId::User(3))
        );

        slot.resolve(&mut source, "a");
        assert_eq!(source.polls, 2);
    }

    #[test]
    fn failure_falls_back_after_one_poll_and_stops_polling() {
        let mut slot = TextureSlot::new(Path::new("/p"), Some("missing.png"));
        let mut source = FakeSource::default();

        slot.resolve(&mut source, "ghost");
        assert_eq!(slot, TextureSlot::Failed);
        assert_eq!(
            slot.fill(NodeKind::Failure),
            SurfaceFill::Flat(kind_color(NodeKind::Failure))
        );

        slot.resolve(&mut source, "ghost");
        assert_eq!(source.polls, 1);
    }
}
