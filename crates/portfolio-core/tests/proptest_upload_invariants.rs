//! Property-based invariant tests for upload validation and deferred tasks.
//!
//! 1. Non-image content types are refused regardless of size
//! 2. Image files are accepted iff their size is within the ceiling
//! 3. Refused selections never change the rendered preview
//! 4. Every ripple is removed exactly `ripple_ms` after its own creation

use core::time::Duration;

use portfolio_core::memory_dom::MemoryDom;
use portfolio_core::upload::validate;
use portfolio_core::{
    BindingKind, Dom, NodeId, PortfolioController, Rect, SelectedFile, UiEvent, UploadError,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn non_image_mime() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("text/plain".to_string()),
        Just("application/pdf".to_string()),
        Just("IMAGE/PNG".to_string()),
        Just("video/mp4".to_string()),
        "[a-z]{1,8}/[a-z0-9.+-]{1,10}".prop_filter("must not be image/*", |m| {
            !m.starts_with("image/")
        }),
    ]
}

fn image_mime() -> impl Strategy<Value = String> {
    "[a-z0-9.+-]{1,10}".prop_map(|subtype| format!("image/{subtype}"))
}

fn binding_kind() -> impl Strategy<Value = (BindingKind, u64)> {
    prop_oneof![
        Just((BindingKind::Profile, 5 * 1024 * 1024)),
        (1u32..=3).prop_map(|slot| (BindingKind::Logo { slot }, 2 * 1024 * 1024)),
    ]
}

fn profile_page() -> (MemoryDom, NodeId, NodeId) {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let pic = dom.add(body, "div", Some("profilePic"), &["profile-pic"]);
    let input = dom.add(body, "input", Some("profileUpload"), &[]);
    (dom, input, pic)
}

proptest! {
    #[test]
    fn non_image_always_rejected(mime in non_image_mime(), size in any::<u64>(), (kind, limit) in binding_kind()) {
        let result = validate(&SelectedFile::new(mime, size), kind, limit);
        let is_invalid_type = matches!(result, Err(UploadError::InvalidFileType { .. }));
        prop_assert!(is_invalid_type);
    }

    #[test]
    fn image_accepted_iff_within_ceiling(mime in image_mime(), size in 0u64..16 * 1024 * 1024, (kind, limit) in binding_kind()) {
        let result = validate(&SelectedFile::new(mime, size), kind, limit);
        prop_assert_eq!(result.is_ok(), size <= limit);
        if let Err(err) = result {
            let too_large = matches!(err, UploadError::FileTooLarge { .. });
            prop_assert!(too_large);
        }
    }

    #[test]
    fn refused_selection_keeps_previous_preview(mime in non_image_mime(), size in any::<u64>()) {
        let (mut dom, input, pic) = profile_page();
        let mut controller = PortfolioController::default();
        controller.initialize(&mut dom);

        let ticket = controller
            .dispatch(&mut dom, UiEvent::FileSelected { input, file: Some(SelectedFile::new("image/png", 1)) })
            .read
            .expect("ticket");
        controller.complete_upload(&mut dom, ticket, "data:first");
        let before = dom.style(pic, "background-image");

        let outcome = controller.dispatch(&mut dom, UiEvent::FileSelected { input, file: Some(SelectedFile::new(mime, size)) });
        prop_assert!(outcome.rejected.is_some());
        prop_assert!(outcome.read.is_none());
        prop_assert_eq!(dom.style(pic, "background-image"), before);
        // The accepted ticket is still current: a late decode still lands.
        prop_assert!(controller.complete_upload(&mut dom, ticket, "data:first-late"));
    }

    #[test]
    fn ripples_live_exactly_their_own_lifetime(offsets in prop::collection::vec(0u64..2_000, 1..12)) {
        let mut dom = MemoryDom::new();
        let body = dom.body();
        let item = dom.add(body, "div", None, &["contact-item"]);
        dom.set_rect(item, Rect::new(0.0, 0.0, 100.0, 40.0));
        let mut controller = PortfolioController::default();
        controller.initialize(&mut dom);

        let mut created_at = offsets;
        created_at.sort_unstable();
        let mut ripples = Vec::new();
        for at in &created_at {
            controller.set_time(&mut dom, Duration::from_millis(*at));
            controller.dispatch(&mut dom, UiEvent::MouseDown { target: item, client_x: 10.0, client_y: 10.0 });
            ripples.push(*dom.children(item).last().expect("ripple appended"));
        }

        let last = *created_at.last().expect("at least one ripple");
        for now in (last..=last + 600).step_by(25) {
            controller.set_time(&mut dom, Duration::from_millis(now));
            for (ripple, at) in ripples.iter().zip(&created_at) {
                prop_assert_eq!(dom.is_connected(*ripple), now < at + 600);
            }
        }
        prop_assert_eq!(controller.live_ripples(), 0);
    }
}
