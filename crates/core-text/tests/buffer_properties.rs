use core_text::{Buffer, grapheme};
use proptest::prelude::*;

fn line_with_clusters() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![Just("a"), Just("x"), Just("e\u{301}"), Just("👍🏽"), Just("界")],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn offsets_survive_position_round_trip(content in "[a-zé\n]{0,40}", pick in any::<prop::sample::Index>()) {
        let buf = Buffer::new(&content);
        let off = pick.index(buf.char_count() + 1);
        let pos = buf.position_of(off);
        prop_assert_eq!(buf.checked_char_index(pos), Some(off));
        prop_assert_eq!(buf.char_index(pos), off);
    }

    #[test]
    fn remove_undoes_insert(content in "[a-z\n]{0,30}", text in "[A-Zß\n]{1,8}", pick in any::<prop::sample::Index>()) {
        let mut buf = Buffer::new(&content);
        let off = pick.index(buf.char_count() + 1);
        buf.insert(off, &text);
        let removed = buf.remove(off, off + text.chars().count());
        prop_assert_eq!(removed, text);
        prop_assert_eq!(buf.content(), content);
    }

    #[test]
    fn boundaries_never_split_clusters(line in line_with_clusters(), pick in any::<prop::sample::Index>()) {
        let len = line.chars().count();
        let col = pick.index(len + 1);
        let prev = grapheme::prev_boundary(&line, col);
        let floor = grapheme::floor_boundary(&line, col);
        let next = grapheme::next_boundary(&line, col);
        prop_assert!(prev <= floor && floor <= col);
        if col > 0 {
            prop_assert!(prev < col);
        }
        prop_assert!(next <= len);
        if col < len {
            prop_assert!(next > col);
        }
        prop_assert_eq!(grapheme::floor_boundary(&line, next), next);
        prop_assert_eq!(grapheme::floor_boundary(&line, prev), prev);
    }
}
