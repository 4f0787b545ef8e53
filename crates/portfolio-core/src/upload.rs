#![forbid(unsafe_code)]

//! Image preview bindings.
//!
//! A binding ties one file input to the element(s) that show its preview.
//! Selection is validated synchronously; decoding is the host's job and
//! comes back later through an [`UploadTicket`]. Each accepted selection
//! bumps the binding generation, so a decode that finishes after a newer
//! selection was accepted is dropped instead of overwriting it.

use core::fmt;

use tracing::debug;

use crate::config::PortfolioConfig;
use crate::dom::{Dom, NodeId};
use crate::error::UploadError;
use crate::markup;

/// The one file the host picker yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Declared content type; contents are never sniffed.
    pub mime: String,
    pub size: u64,
}

impl SelectedFile {
    #[must_use]
    pub fn new(mime: impl Into<String>, size: u64) -> Self {
        Self {
            mime: mime.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Profile,
    /// 1-based slot, matching the `logo{slot}*` element ids.
    Logo { slot: u32 },
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => f.write_str("profile"),
            Self::Logo { slot } => write!(f, "logo {slot}"),
        }
    }
}

/// Index of a binding inside [`UploadBindings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

/// Routes an asynchronous decode back to the selection that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket {
    pub binding: BindingId,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct UploadBinding {
    pub kind: BindingKind,
    pub input: NodeId,
    /// Profile: the picture element. Logo: the `<img>`.
    pub display: NodeId,
    pub placeholder: Option<NodeId>,
    pub max_bytes: u64,
    generation: u64,
}

impl UploadBinding {
    /// Generation of the most recently accepted selection.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Check the declared type, then the size, against one binding's ceiling.
pub fn validate(file: &SelectedFile, kind: BindingKind, max_bytes: u64) -> Result<(), UploadError> {
    if !file.mime.starts_with("image/") {
        return Err(UploadError::InvalidFileType {
            mime: file.mime.clone(),
        });
    }
    if file.size > max_bytes {
        return Err(UploadError::FileTooLarge {
            kind,
            size: file.size,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// All bindings whose elements were present at initialization.
#[derive(Debug, Clone, Default)]
pub struct UploadBindings {
    bindings: Vec<UploadBinding>,
}

impl UploadBindings {
    /// Resolve configured ids against `dom`, skipping incomplete bindings.
    pub fn resolve(dom: &impl Dom, config: &PortfolioConfig) -> Self {
        let mut bindings = Vec::new();

        let profile = &config.profile;
        match (
            dom.element_by_id(&profile.input_id),
            dom.element_by_id(&profile.display_id),
        ) {
            (Some(input), Some(display)) => bindings.push(UploadBinding {
                kind: BindingKind::Profile,
                input,
                display,
                placeholder: None,
                max_bytes: profile.max_bytes,
                generation: 0,
            }),
            _ => debug!(input = %profile.input_id, "profile upload markup missing; binding skipped"),
        }

        for (index, logo) in config.logos.iter().enumerate() {
            let slot = index as u32 + 1;
            match (
                dom.element_by_id(&logo.input_id),
                dom.element_by_id(&logo.image_id),
                dom.element_by_id(&logo.placeholder_id),
            ) {
                (Some(input), Some(display), Some(placeholder)) => bindings.push(UploadBinding {
                    kind: BindingKind::Logo { slot },
                    input,
                    display,
                    placeholder: Some(placeholder),
                    max_bytes: logo.max_bytes,
                    generation: 0,
                }),
                _ => debug!(slot, input = %logo.input_id, "logo upload markup missing; binding skipped"),
            }
        }

        Self { bindings }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &UploadBinding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| (BindingId(index), binding))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: BindingId) -> Option<&UploadBinding> {
        self.bindings.get(id.0)
    }

    #[must_use]
    pub fn by_input(&self, input: NodeId) -> Option<BindingId> {
        self.iter()
            .find(|(_, binding)| binding.input == input)
            .map(|(id, _)| id)
    }

    #[must_use]
    pub fn by_kind(&self, kind: BindingKind) -> Option<BindingId> {
        self.iter()
            .find(|(_, binding)| binding.kind == kind)
            .map(|(id, _)| id)
    }

    /// Validate a selection. `Ok(None)` when the picker yielded nothing.
    pub fn select(
        &mut self,
        id: BindingId,
        file: Option<&SelectedFile>,
    ) -> Result<Option<UploadTicket>, UploadError> {
        let Some(binding) = self.bindings.get_mut(id.0) else {
            return Ok(None);
        };
        let Some(file) = file else {
            return Ok(None);
        };
        validate(file, binding.kind, binding.max_bytes)?;
        binding.generation += 1;
        Ok(Some(UploadTicket {
            binding: id,
            generation: binding.generation,
        }))
    }

    /// The binding for `ticket`, unless a newer selection superseded it.
    #[must_use]
    pub fn current(&self, ticket: UploadTicket) -> Option<&UploadBinding> {
        self.get(ticket.binding)
            .filter(|binding| binding.generation == ticket.generation)
    }
}

/// Write a decoded preview; returns the element that should play the
/// confirmation pulse.
pub fn render_preview(dom: &mut impl Dom, binding: &UploadBinding, data_uri: &str) -> Option<NodeId> {
    match binding.kind {
        BindingKind::Profile => {
            let display = binding.display;
            dom.set_style(display, "background-image", &format!("url({data_uri})"));
            dom.set_style(display, "background-size", "cover");
            dom.set_style(display, "background-position", "center");
            dom.add_class(display, markup::HAS_IMAGE);
            Some(display)
        }
        BindingKind::Logo { slot } => {
            dom.set_attribute(binding.display, "src", data_uri);
            dom.set_style(binding.display, "display", "block");
            if let Some(placeholder) = binding.placeholder {
                dom.set_style(placeholder, "display", "none");
            }
            let container = dom.closest(binding.display, markup::LOGO_UPLOAD);
            match container {
                Some(container) => dom.add_class(container, markup::HAS_LOGO),
                None => debug!(slot, "logo image has no .logo-upload container"),
            }
            container
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::MemoryDom;

    fn page() -> (MemoryDom, PortfolioConfig) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        dom.add(body, "input", Some("profileUpload"), &[]);
        dom.add(body, "div", Some("profilePic"), &["profile-pic"]);
        let container = dom.add(body, "div", None, &["logo-upload"]);
        dom.add(container, "input", Some("logo1Upload"), &[]);
        dom.add(container, "img", Some("logo1Image"), &[]);
        dom.add(container, "span", Some("logo1Placeholder"), &[]);
        (dom, PortfolioConfig::default())
    }

    #[test]
    fn validation_checks_type_before_size() {
        let err = validate(&SelectedFile::new("application/pdf", u64::MAX), BindingKind::Profile, 10)
            .expect_err("wrong type");
        assert!(matches!(err, UploadError::InvalidFileType { .. }));
    }

    #[test]
    fn validation_ceiling_is_inclusive() {
        assert!(validate(&SelectedFile::new("image/png", 10), BindingKind::Profile, 10).is_ok());
        assert!(matches!(
            validate(&SelectedFile::new("image/png", 11), BindingKind::Profile, 10),
            Err(UploadError::FileTooLarge { size: 11, limit: 10, .. })
        ));
    }

    #[test]
    fn incomplete_logo_slots_are_skipped() {
        let (dom, config) = page();
        let bindings = UploadBindings::resolve(&dom, &config);
        assert_eq!(bindings.len(), 2);
        assert!(bindings.by_kind(BindingKind::Profile).is_some());
        assert!(bindings.by_kind(BindingKind::Logo { slot: 1 }).is_some());
        assert!(bindings.by_kind(BindingKind::Logo { slot: 2 }).is_none());
    }

    #[test]
    fn newer_selection_supersedes_pending_ticket() {
        let (dom, config) = page();
        let mut bindings = UploadBindings::resolve(&dom, &config);
        let id = bindings.by_kind(BindingKind::Profile).expect("profile binding");
        let png = SelectedFile::new("image/png", 1024);

        let first = bindings.select(id, Some(&png)).expect("valid").expect("ticket");
        let second = bindings.select(id, Some(&png)).expect("valid").expect("ticket");
        assert!(bindings.current(first).is_none());
        assert!(bindings.current(second).is_some());
    }

    #[test]
    fn rejected_selection_keeps_pending_ticket_current() {
        let (dom, config) = page();
        let mut bindings = UploadBindings::resolve(&dom, &config);
        let id = bindings.by_kind(BindingKind::Profile).expect("profile binding");

        let ticket = bindings
            .select(id, Some(&SelectedFile::new("image/jpeg", 10)))
            .expect("valid")
            .expect("ticket");
        assert!(
            bindings
                .select(id, Some(&SelectedFile::new("text/plain", 10)))
                .is_err()
        );
        assert!(bindings.current(ticket).is_some());
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let (dom, config) = page();
        let mut bindings = UploadBindings::resolve(&dom, &config);
        let id = bindings.by_kind(BindingKind::Profile).expect("profile binding");
        assert_eq!(bindings.select(id, None), Ok(None));
        assert_eq!(bindings.get(id).map(UploadBinding::generation), Some(0));
    }

    #[test]
    fn logo_preview_targets_container() {
        let (mut dom, config) = page();
        let bindings = UploadBindings::resolve(&dom, &config);
        let id = bindings.by_kind(BindingKind::Logo { slot: 1 }).expect("logo binding");
        let binding = bindings.get(id).expect("binding").clone();

        let pulse = render_preview(&mut dom, &binding, "data:image/png;base64,AAAA");
        let container = dom.closest(binding.display, "logo-upload");
        assert_eq!(pulse, container);
        assert_eq!(
            dom.attribute(binding.display, "src").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(dom.style(binding.display, "display").as_deref(), Some("block"));
        assert_eq!(
            dom.style(binding.placeholder.expect("placeholder"), "display").as_deref(),
            Some("none")
        );
        assert!(dom.has_class(container.expect("container"), "has-logo"));
    }
}
