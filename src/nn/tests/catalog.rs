/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 候选操作目录测试：名称解析、构建预设与形状契约
 */

use super::{feature_map, seeded_rng};
use crate::assert_err;
use crate::errors::NasError;
use crate::nn::operations::{Operation, TraitOperation};
use crate::nn::{Module, OPS, OperationKind, PRIMITIVES, construct};

#[test]
fn test_ops_order_matches_kind() {
    for (i, spec) in OPS.iter().enumerate() {
        assert_eq!(spec.kind as usize, i);
        assert_eq!(spec.kind.spec(), spec);
        assert_eq!(spec.kind.name(), spec.name);
    }
}

#[test]
fn test_names_round_trip() {
    for spec in &OPS {
        let kind: OperationKind = spec.name.parse().unwrap();
        assert_eq!(kind, spec.kind);
        assert_eq!(kind.to_string(), spec.name);
    }
}

#[test]
fn test_serde_uses_catalog_names() {
    for spec in &OPS {
        let json = serde_json::to_string(&spec.kind).unwrap();
        assert_eq!(json, format!("\"{}\"", spec.name));
        let back: OperationKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec.kind);
    }
}

#[test]
fn test_unknown_name() {
    assert_err!(
        "conv_9x9".parse::<OperationKind>(),
        NasError::UnknownOperation("conv_9x9")
    );
    // 大小写敏感
    assert_err!(
        "Skip_Connect".parse::<OperationKind>(),
        NasError::UnknownOperation("Skip_Connect")
    );
    assert_err!(construct("", 4, 1, false), NasError::UnknownOperation(""));
}

#[test]
fn test_only_pools_need_post_normalization() {
    let flagged = OPS
        .iter()
        .filter(|spec| spec.needs_post_normalization)
        .map(|spec| spec.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        flagged,
        [OperationKind::AvgPool3x3, OperationKind::MaxPool3x3]
    );
}

#[test]
fn test_primitives() {
    let names = PRIMITIVES.iter().map(|k| k.name()).collect::<Vec<_>>();
    assert_eq!(
        names,
        [
            "none",
            "max_pool_3x3",
            "avg_pool_3x3",
            "skip_connect",
            "sep_conv_3x3",
            "sep_conv_5x5",
            "dil_conv_3x3",
            "dil_conv_5x5",
        ]
    );
    assert!(!PRIMITIVES.contains(&OperationKind::SepConv7x7));
    assert!(!PRIMITIVES.contains(&OperationKind::Conv7x1And1x7));
}

#[test]
fn test_every_entry_preserves_shape_at_stride_1() {
    let x = feature_map(&[2, 4, 8, 8], 21);
    let mut rng = seeded_rng(21);
    for spec in &OPS {
        let mut op = spec.kind.build_with_rng(4, 1, false, &mut rng).unwrap();
        let y = op.forward(&x).unwrap();
        assert_eq!(y.shape(), &[2, 4, 8, 8], "`{}` 改变了形状", spec.name);
        assert_eq!(op.output_shape(x.shape()).unwrap(), y.shape());
    }
}

#[test]
fn test_every_entry_halves_at_stride_2() {
    let x = feature_map(&[2, 4, 8, 8], 22);
    let mut rng = seeded_rng(22);
    for spec in &OPS {
        let mut op = spec.kind.build_with_rng(4, 2, true, &mut rng).unwrap();
        let y = op.forward(&x).unwrap();
        assert_eq!(y.shape(), &[2, 4, 4, 4], "`{}` 未将空间尺寸减半", spec.name);
        assert_eq!(op.output_shape(x.shape()).unwrap(), y.shape());
    }
}

#[test]
fn test_skip_connect_depends_on_stride() {
    let op = construct("skip_connect", 4, 1, false).unwrap();
    assert!(matches!(op, Operation::Identity(_)));
    assert_eq!(op.num_params(), 0);

    let op = construct("skip_connect", 4, 2, false).unwrap();
    assert!(matches!(op, Operation::FactorizedReduce(_)));
    assert_eq!(op.num_params(), 2);

    // stride 2 的 skip_connect 需要偶数通道
    assert_err!(
        construct("skip_connect", 5, 2, false),
        NasError::OddChannels { channels: 5 }
    );
    assert!(construct("skip_connect", 5, 1, false).is_ok());
}

#[test]
fn test_build_variants() {
    let mut rng = seeded_rng(23);
    let build = |kind: OperationKind, rng: &mut _| kind.build_with_rng(4, 1, false, rng).unwrap();

    assert!(matches!(build(OperationKind::None, &mut rng), Operation::Zero(_)));
    assert!(matches!(build(OperationKind::AvgPool3x3, &mut rng), Operation::Pool(_)));
    assert!(matches!(build(OperationKind::MaxPool3x3, &mut rng), Operation::Pool(_)));
    assert!(matches!(build(OperationKind::SepConv5x5, &mut rng), Operation::SepConv(_)));
    assert!(matches!(build(OperationKind::DilConv5x5, &mut rng), Operation::DilConv(_)));
    assert!(matches!(
        build(OperationKind::Conv7x1And1x7, &mut rng),
        Operation::Conv7x1And1x7(_)
    ));

    match build(OperationKind::DilConv5x5, &mut rng) {
        Operation::DilConv(op) => {
            assert_eq!(op.depthwise().kernel_size(), (5, 5));
            assert_eq!(op.depthwise().params().padding, (4, 4));
            assert_eq!(op.depthwise().params().dilation, (2, 2));
        }
        other => panic!("预期 DilConv，实际得到 {}", other.name()),
    }
    match build(OperationKind::SepConv7x7, &mut rng) {
        Operation::SepConv(op) => {
            let (stage_1, _) = op.stages();
            assert_eq!(stage_1.depthwise().kernel_size(), (7, 7));
            assert_eq!(stage_1.depthwise().params().padding, (3, 3));
        }
        other => panic!("预期 SepConv，实际得到 {}", other.name()),
    }
}

#[test]
fn test_affine_flag_reaches_batch_norm() {
    let op = construct("sep_conv_3x3", 4, 1, false).unwrap();
    assert_eq!(op.num_params(), 4);
    let op = construct("sep_conv_3x3", 4, 1, true).unwrap();
    assert_eq!(op.num_params(), 8);
}

#[test]
fn test_build_invalid_arguments() {
    assert_err!(
        OperationKind::SepConv3x3.build(0, 1, false),
        NasError::InvalidConfig(_)
    );
    assert_err!(OperationKind::None.build(4, 0, false), NasError::InvalidConfig(_));
}
