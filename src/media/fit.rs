/// Contain-fit sizing
///
/// Scales an image uniformly so it fits entirely inside a container,
/// leaving letterbox space on one axis.

use crate::state::data::{ContainerSize, IntrinsicSize};

/// Compute the rendered size of `intrinsic` inside `container`.
///
/// Returns `None` when the intrinsic size is zero, negative or not finite.
/// A zero container axis yields a zero scale and a collapsed size.
pub fn contain_fit(intrinsic: IntrinsicSize, container: ContainerSize) -> Option<(f32, f32)> {
    if !(intrinsic.width > 0.0 && intrinsic.height > 0.0)
        || !intrinsic.width.is_finite()
        || !intrinsic.height.is_finite()
    {
        return None;
    }

    let scale = contain_scale(intrinsic, container);
    Some((intrinsic.width * scale, intrinsic.height * scale))
}

/// Uniform scale factor for a contain fit (assumes a positive intrinsic size)
pub fn contain_scale(intrinsic: IntrinsicSize, container: ContainerSize) -> f32 {
    let width_ratio = container.width.max(0.0) / intrinsic.width;
    let height_ratio = container.height.max(0.0) / intrinsic.height;
    width_ratio.min(height_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_landscape_in_portrait_container() {
        // scale = min(300/1200, 600/800) = 0.25
        let intrinsic = IntrinsicSize::new(1200.0, 800.0);
        let container = ContainerSize::new(300.0, 600.0);

        assert_eq!(contain_scale(intrinsic, container), 0.25);
        assert_eq!(contain_fit(intrinsic, container), Some((300.0, 200.0)));
    }

    #[test]
    fn test_zero_container_collapses() {
        let intrinsic = IntrinsicSize::new(640.0, 480.0);
        assert_eq!(contain_fit(intrinsic, ContainerSize::new(0.0, 600.0)), Some((0.0, 0.0)));
        assert_eq!(contain_fit(intrinsic, ContainerSize::default()), Some((0.0, 0.0)));
    }

    #[test]
    fn test_zero_intrinsic_is_rejected() {
        let container = ContainerSize::new(300.0, 600.0);
        assert_eq!(contain_fit(IntrinsicSize::new(0.0, 800.0), container), None);
        assert_eq!(contain_fit(IntrinsicSize::new(800.0, 0.0), container), None);
        assert_eq!(contain_fit(IntrinsicSize::new(f32::NAN, 10.0), container), None);
    }

    proptest! {
        /// The fitted size keeps the aspect ratio, stays inside the container
        /// and touches it on at least one axis
        #[test]
        fn fit_is_tight_and_proportional(
            w in 1.0f32..10_000.0,
            h in 1.0f32..10_000.0,
            cw in 1.0f32..5_000.0,
            ch in 1.0f32..5_000.0,
        ) {
            let (rw, rh) = contain_fit(IntrinsicSize::new(w, h), ContainerSize::new(cw, ch)).unwrap();
            let tolerance = 1e-3;

            prop_assert!(((rw / rh) - (w / h)).abs() <= (w / h) * tolerance);
            prop_assert!(rw <= cw * (1.0 + tolerance));
            prop_assert!(rh <= ch * (1.0 + tolerance));
            prop_assert!(
                (rw - cw).abs() <= cw * tolerance || (rh - ch).abs() <= ch * tolerance
            );
        }

        /// Same inputs, bit-identical output
        #[test]
        fn fit_is_idempotent(
            w in 1.0f32..10_000.0,
            h in 1.0f32..10_000.0,
            cw in 0.0f32..5_000.0,
            ch in 0.0f32..5_000.0,
        ) {
            let intrinsic = IntrinsicSize::new(w, h);
            let container = ContainerSize::new(cw, ch);
            let first = contain_fit(intrinsic, container).unwrap();
            let second = contain_fit(intrinsic, container).unwrap();
            prop_assert_eq!(first.0.to_bits(), second.0.to_bits());
            prop_assert_eq!(first.1.to_bits(), second.1.to_bits());
        }
    }
}
