//! Butterfly artwork: wing outlines, gradient color pairs and SVG markup.

/// Gradient start/end colors for the wings.
pub const COLORS: [(&str, &str); 8] = [
	("#ff7aa2", "#ffcc70"),
	("#7dd3fc", "#a78bfa"),
	("#34d399", "#60a5fa"),
	("#f59e0b", "#f97316"),
	("#fb7185", "#fda4af"),
	("#22c55e", "#86efac"),
	("#38bdf8", "#67e8f9"),
	("#c084fc", "#f472b6"),
];

/// A pair of wing paths in a 48×48 view box.
pub struct WingShape {
	pub left: &'static str,
	pub right: &'static str,
}

pub const SHAPES: [WingShape; 4] = [
	// rounded
	WingShape {
		left: "M24,32 C10,26 8,12 18,8 C26,4 34,10 32,18 C31,24 28,29 24,32 Z",
		right: "M24,32 C38,26 40,12 30,8 C22,4 14,10 16,18 C17,24 20,29 24,32 Z",
	},
	// pointed
	WingShape {
		left: "M24,32 C12,30 6,16 16,10 C24,4 34,10 30,18 C27,25 28,30 24,32 Z",
		right: "M24,32 C36,30 42,16 32,10 C24,4 14,10 18,18 C21,25 20,30 24,32 Z",
	},
	// big upper
	WingShape {
		left: "M24,32 C9,28 6,10 18,7 C30,4 35,14 31,21 C28,27 28,30 24,32 Z",
		right: "M24,32 C39,28 42,10 30,7 C18,4 13,14 17,21 C20,27 20,30 24,32 Z",
	},
	// narrow
	WingShape {
		left: "M24,32 C14,28 10,12 18,9 C25,6 30,12 30,18 C30,25 28,30 24,32 Z",
		right: "M24,32 C34,28 38,12 30,9 C23,6 18,12 18,18 C18,25 20,30 24,32 Z",
	},
];

/// SVG markup for one butterfly. `uid` keeps gradient ids unique in the page.
pub fn butterfly_svg(colors: usize, shape: usize, uid: u32) -> String {
	let (c1, c2) = COLORS[colors % COLORS.len()];
	let shape = &SHAPES[shape % SHAPES.len()];
	format!(
		concat!(
			r#"<svg viewBox="0 0 48 48" width="100%" height="100%" aria-hidden="true" focusable="false">"#,
			r#"<defs><linearGradient id="bf{uid:x}" x1="0" y1="0" x2="1" y2="1">"#,
			r#"<stop offset="0" stop-color="{c1}" stop-opacity="0.95"/>"#,
			r#"<stop offset="1" stop-color="{c2}" stop-opacity="0.95"/>"#,
			r#"</linearGradient></defs>"#,
			r#"<g fill="url(#bf{uid:x})"><path d="{left}"/><path d="{right}"/></g>"#,
			r#"<path d="M24 14 C22 18 22 22 24 34 C26 22 26 18 24 14 Z" fill="rgba(30,30,30,0.55)"/>"#,
			r#"<circle cx="24" cy="13" r="1.6" fill="rgba(30,30,30,0.6)"/>"#,
			r#"</svg>"#,
		),
		uid = uid,
		c1 = c1,
		c2 = c2,
		left = shape.left,
		right = shape.right,
	)
}
