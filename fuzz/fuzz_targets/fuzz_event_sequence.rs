#![no_main]

use core::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use portfolio_core::memory_dom::MemoryDom;
use portfolio_core::{
    IntersectionEntry, NodeId, ObserverKind, PortfolioController, SelectedFile, UiEvent,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Select { input: u8, image: bool, size: u32 },
    Decode { uri: u8 },
    Click { node: u8 },
    Enter { node: u8 },
    Leave { node: u8 },
    Press { node: u8, x: i16, y: i16 },
    Resize { width: u16 },
    Reveal { node: u8, ratio: u8 },
    Emphasize { node: u8 },
    Tick { ms: u16 },
}

fn page() -> MemoryDom {
    let mut dom = MemoryDom::new();
    let body = dom.body();
    let section = dom.add(body, "section", Some("about"), &["section"]);
    dom.add(section, "h2", None, &["section-title"]);
    dom.add(section, "div", Some("profilePic"), &["profile-pic"]);
    dom.add(section, "input", Some("profileUpload"), &[]);
    for slot in 1..=3 {
        let logo = dom.add(section, "div", None, &["logo-upload"]);
        dom.add(logo, "img", Some(format!("logo{slot}Image").as_str()), &[]);
        dom.add(logo, "span", Some(format!("logo{slot}Placeholder").as_str()), &[]);
        dom.add(logo, "input", Some(format!("logo{slot}Upload").as_str()), &[]);
    }
    let card = dom.add(section, "div", None, &["card", "position-item"]);
    dom.add(card, "i", None, &["position-icon"]);
    dom.add(section, "span", None, &["skill-tag"]);
    dom.add(section, "a", None, &["contact-item"]);
    dom.add_link(body, "#about");
    dom.add_link(body, "#missing");
    dom
}

fuzz_target!(|ops: Vec<Op>| {
    let mut dom = page();
    let mut controller = PortfolioController::default();
    controller.initialize(&mut dom);
    let node_count = dom.node_count() as u32;
    let node = |raw: u8| NodeId::new(u32::from(raw) % node_count);
    let inputs: Vec<NodeId> = controller.bindings().iter().map(|(_, b)| b.input).collect();
    let mut tickets = Vec::new();
    let mut now = Duration::ZERO;

    for op in ops.into_iter().take(256) {
        let event = match op {
            Op::Select { input, image, size } => {
                let mime = if image { "image/png" } else { "text/plain" };
                UiEvent::FileSelected {
                    input: inputs[usize::from(input) % inputs.len()],
                    file: Some(SelectedFile::new(mime, u64::from(size) * 64)),
                }
            }
            Op::Decode { uri } => {
                if let Some(ticket) = tickets.pop() {
                    controller.complete_upload(&mut dom, ticket, &format!("data:{uri}"));
                }
                continue;
            }
            Op::Click { node: n } => UiEvent::Click { target: node(n) },
            Op::Enter { node: n } => UiEvent::MouseEnter { target: node(n) },
            Op::Leave { node: n } => UiEvent::MouseLeave { target: node(n) },
            Op::Press { node: n, x, y } => UiEvent::MouseDown {
                target: node(n),
                client_x: f64::from(x),
                client_y: f64::from(y),
            },
            Op::Resize { width } => {
                dom.set_viewport_width(f64::from(width));
                UiEvent::Resize
            }
            Op::Reveal { node: n, ratio } => UiEvent::Intersection {
                observer: ObserverKind::Reveal,
                entries: vec![IntersectionEntry::new(node(n), true, f64::from(ratio) / 255.0)],
            },
            Op::Emphasize { node: n } => UiEvent::Intersection {
                observer: ObserverKind::Emphasis,
                entries: vec![IntersectionEntry::new(node(n), true, 1.0)],
            },
            Op::Tick { ms } => {
                now += Duration::from_millis(u64::from(ms));
                controller.set_time(&mut dom, now);
                continue;
            }
        };
        let outcome = controller.dispatch(&mut dom, event);
        assert!(outcome.read.is_none() || outcome.rejected.is_none());
        tickets.extend(outcome.read);
    }

    // Draining the clock releases every deferred task.
    controller.set_time(&mut dom, now + Duration::from_secs(60));
    assert_eq!(controller.pending_timers(), 0);
    assert_eq!(controller.live_ripples(), 0);
});
