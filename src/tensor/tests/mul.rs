use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_mul_scalar() {
    let a = Tensor::new(&[1., -2., 3., -4.], &[2, 2]);
    let expected = Tensor::new(&[0.5, -1., 1.5, -2.], &[2, 2]);
    assert_eq!(&a * 0.5, expected);
    assert_eq!(0.5 * &a, expected);
    assert_eq!(a.clone() * 0.5, expected);
    assert_eq!(0.5 * a, expected);
}

#[test]
fn test_mul_zero_keeps_shape() {
    let a = Tensor::new_random(-1., 1., &[2, 3, 4, 5]);
    let z = &a * 0.;
    assert_eq!(z.shape(), &[2, 3, 4, 5]);
    assert!(z.is_all_zero());
}

#[test]
fn test_relu_is_not_inplace() {
    let a = Tensor::new(&[-1., 0., 2., -3.], &[1, 1, 2, 2]);
    let r = a.relu();
    assert_eq!(r, Tensor::new(&[0., 0., 2., 0.], &[1, 1, 2, 2]));
    // 原张量不变
    assert_eq!(a[[0, 0, 0, 0]], -1.);
}

#[test]
fn test_sum() {
    let a = Tensor::new(&[1., 2., 3., 4.5], &[2, 2]);
    assert_abs_diff_eq!(a.sum(), 10.5, epsilon = 1e-6);
}
