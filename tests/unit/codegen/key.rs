use super::*;
use crate::effects::{Swizzle, dest_color, make_color, swizzle_output};
use crate::foundation::core::PmColor4f;
use crate::foundation::ids::ClassId;
use crate::node::flags::{OptimizationFlags, SampleUsage};
use crate::node::kind::EffectKind;
use crate::node::tree::EffectNode;

#[test]
fn builder_writes_fixed_width_words() {
    let mut b = KeyBuilder::new();
    assert!(b.is_empty());
    b.add32(7);
    b.add_bool(true);
    b.add_f32(1.0);
    assert_eq!(b.len(), 3);
    assert_eq!(b.finish().words(), &[7, 1, 0x3f80_0000]);
}

#[test]
fn leaf_key_layout() {
    let key = ProgramKey::of(&dest_color());
    assert_eq!(key.words(), &[ClassId::DestColor as u32, 0, 0]);
}

#[test]
fn null_slots_are_marked() {
    let mut n = EffectNode::new(EffectKind::Compose, OptimizationFlags::empty());
    n.register_child(None, SampleUsage::pass_through());
    n.register_child(Some(dest_color()), SampleUsage::pass_through());
    let words = ProgramKey::of(&n).words().to_vec();

    assert_eq!(&words[..4], &[ClassId::Compose as u32, 0, 2, NULL_CHILD_KEY]);
    assert_eq!(words[4], SampleUsage::pass_through().key_bits());
    assert_eq!(&words[5..], &[ClassId::DestColor as u32, 0, 0]);
}

#[test]
fn parameters_enter_the_key() {
    let a = swizzle_output(Some(dest_color()), Swizzle::parse("bgra").unwrap()).unwrap();
    let b = swizzle_output(Some(dest_color()), Swizzle::parse("gbra").unwrap()).unwrap();
    assert_ne!(ProgramKey::of(&a), ProgramKey::of(&b));
}

#[test]
fn equal_trees_have_equal_keys_and_fingerprints() {
    let a = swizzle_output(Some(make_color(PmColor4f::WHITE)), Swizzle::parse("abgr").unwrap())
        .unwrap();
    let b = a.clone_boxed();
    assert!(a.is_equal(&b));
    let (ka, kb) = (ProgramKey::of(&a), ProgramKey::of(&b));
    assert_eq!(ka, kb);
    assert_eq!(ka.fingerprint(), kb.fingerprint());
}

#[test]
fn fingerprint_depends_on_length_and_content() {
    let mut a = KeyBuilder::new();
    a.add32(1);
    let mut b = KeyBuilder::new();
    b.add32(1);
    b.add32(0);
    let (fa, fb) = (a.finish().fingerprint(), b.finish().fingerprint());
    assert_ne!(fa, fb);
    assert_eq!(fa.to_string().len(), 32);
}
