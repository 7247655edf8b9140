/// User interface module
///
/// - Swipe gesture state machine (swipe.rs)
/// - Settle / fly-off animations (animation.rs)
/// - Card layer canvas program (canvas.rs)
/// - Detail screen (detail.rs)

pub mod animation;
pub mod canvas;
pub mod detail;
pub mod swipe;
