use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

/// One token per whitespace-separated word, with a single space between.
fn list_of(words: &[&str]) -> (TokenList, Vec<TokenId>) {
    let source = words.join(" ");
    let mut list = TokenList::new(source.as_str());
    let mut ids = Vec::new();
    let mut pos = 0u32;
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            list.append(TokenKind::Whitespace, Span::at(pos, 1), 1);
            pos += 1;
        }
        #[allow(clippy::cast_possible_truncation)]
        let len = word.len() as u32;
        ids.push(list.append(TokenKind::Symbol, Span::at(pos, len), 1));
        pos += len;
    }
    (list, ids)
}

fn run(list: &mut TokenList, words: &[&str]) -> Option<TokenRange> {
    let ids: Vec<TokenId> = words
        .iter()
        .map(|w| list.synthesize(TokenKind::Symbol, *w, 0))
        .collect();
    list.chain(&ids).unwrap()
}

#[test]
fn append_links_in_order() {
    let (list, ids) = list_of(&["a", "bb", "c"]);
    assert_eq!(list.len(), 5);
    assert_eq!(list.head(), Some(ids[0]));
    assert_eq!(list.tail(), Some(ids[2]));
    assert_eq!(list.to_text(), "a bb c");
    assert_eq!(list.text(ids[1]), "bb");
}

#[test]
fn append_moves_the_tail() {
    let mut list = TokenList::new("a b");
    let a = list.append(TokenKind::Symbol, Span::at(0, 1), 1);
    assert_eq!((list.head(), list.tail()), (Some(a), Some(a)));
    let space = list.append(TokenKind::Whitespace, Span::at(1, 1), 1);
    assert_eq!((list.head(), list.tail()), (Some(a), Some(space)));
    let b = list.append(TokenKind::Symbol, Span::at(2, 1), 1);
    assert_eq!((list.head(), list.tail()), (Some(a), Some(b)));
    assert_eq!(list.len(), 3);
    assert_eq!(list.next(a), Some(space));
    assert_eq!(list.prev(b), Some(space));
    assert_eq!(list.to_text(), "a b");
}

#[test]
fn links_are_symmetric() {
    let (list, _) = list_of(&["x", "y", "z"]);
    for id in list.iter() {
        if let Some(next) = list.next(id) {
            assert_eq!(list.prev(next), Some(id));
        }
    }
    assert_eq!(list.prev(list.head().unwrap()), None);
    assert_eq!(list.next(list.tail().unwrap()), None);
}

#[test]
fn symbols_are_hashed() {
    let (list, ids) = list_of(&["foo", "foo", "bar"]);
    assert_eq!(list.hash(ids[0]), list.hash(ids[1]));
    assert_ne!(list.hash(ids[0]), list.hash(ids[2]));
    assert_eq!(list.hash(ids[0]), Some(content_hash("foo")));
    let space = list.next(ids[0]).unwrap();
    assert_eq!(list.hash(space), None);
}

#[test]
fn synthesized_keyword_is_hashed() {
    let mut list = TokenList::new("");
    let id = list.synthesize(TokenKind::Typedef, "typedef", 3);
    assert_eq!(list.hash(id), Some(content_hash("typedef")));
    assert!(!list.is_linked(id));
    assert_eq!(list.line(id), 3);
}

#[test]
fn significant_navigation_skips_trivia() {
    let (list, ids) = list_of(&["a", "b"]);
    let space = list.next(ids[0]).unwrap();
    assert_eq!(list.significant_from(space), Some(ids[1]));
    assert_eq!(list.next_significant(ids[0]), Some(ids[1]));
    assert_eq!(list.prev_significant(ids[1]), Some(ids[0]));
    assert_eq!(list.prev_significant(ids[0]), None);
}

#[test]
fn range_iterates_inclusively() {
    let (list, ids) = list_of(&["a", "b", "c", "d"]);
    let texts: Vec<&str> = list
        .range(TokenRange::new(ids[1], ids[2]))
        .map(|id| list.text(id))
        .collect();
    assert_eq!(texts, vec!["b", " ", "c"]);
}

#[test]
fn replace_swaps_in_new_run() {
    let (mut list, ids) = list_of(&["a", "b", "c"]);
    let new = run(&mut list, &["X", "Y"]);
    let splice = list.replace(TokenRange::single(ids[1]), new).unwrap();

    assert_eq!(list.to_text(), "a XY c");
    assert_eq!(splice.removed, vec![ids[1]]);
    assert_eq!(splice.inserted, new);
    assert_eq!(list.len(), 6);
    assert!(list.get(ids[1]).is_none());
}

#[test]
fn replace_at_head_and_tail_updates_ends() {
    let (mut list, ids) = list_of(&["a", "b"]);
    let head_run = run(&mut list, &["H"]).unwrap();
    list.replace(TokenRange::single(ids[0]), Some(head_run)).unwrap();
    assert_eq!(list.head(), Some(head_run.first));

    let tail_run = run(&mut list, &["T"]).unwrap();
    list.replace(TokenRange::single(ids[1]), Some(tail_run)).unwrap();
    assert_eq!(list.tail(), Some(tail_run.last));
    assert_eq!(list.to_text(), "H T");
}

#[test]
fn pure_deletion_reports_neighbours() {
    let (mut list, ids) = list_of(&["a", "b", "c"]);
    let before = list.prev(ids[1]);
    let after = list.next(ids[1]);
    let splice = list.replace(TokenRange::single(ids[1]), None).unwrap();
    assert_eq!(splice.inserted, None);
    assert_eq!(splice.before, before);
    assert_eq!(splice.after, after);
    assert_eq!(list.to_text(), "a  c");
}

#[test]
fn deleting_everything_empties_list() {
    let (mut list, ids) = list_of(&["a", "b"]);
    list.replace(TokenRange::new(ids[0], ids[1]), None).unwrap();
    assert!(list.is_empty());
    assert_eq!(list.head(), None);
    assert_eq!(list.tail(), None);
    assert_eq!(list.to_text(), "");
}

#[test]
fn pure_insertion_keeps_existing_tokens() {
    let (mut list, ids) = list_of(&["a", "b"]);
    let before = run(&mut list, &["<"]).unwrap();
    list.insert_before(ids[0], before).unwrap();
    let after = run(&mut list, &[">"]).unwrap();
    list.insert_after(ids[1], after).unwrap();
    assert_eq!(list.to_text(), "<a b>");
    assert_eq!(list.head(), Some(before.first));
    assert_eq!(list.tail(), Some(after.last));
    assert!(list.get(ids[0]).is_some());
}

#[test]
fn relinking_a_run_is_rejected() {
    let (mut list, ids) = list_of(&["a", "b"]);
    let new = run(&mut list, &["X"]).unwrap();
    list.insert_before(ids[1], new).unwrap();
    assert_eq!(
        list.insert_before(ids[0], new),
        Err(SpliceError::AlreadyLinked(new.first))
    );
}

#[test]
fn replacing_detached_tokens_is_rejected() {
    let (mut list, _) = list_of(&["a"]);
    let new = run(&mut list, &["X"]).unwrap();
    assert_eq!(
        list.replace(new, None),
        Err(SpliceError::NotLinked(new.first))
    );
}

#[test]
fn backwards_range_is_broken() {
    let (mut list, ids) = list_of(&["a", "b"]);
    let text = list.to_text();
    assert_eq!(
        list.replace(TokenRange::new(ids[1], ids[0]), None),
        Err(SpliceError::Broken {
            first: ids[1],
            last: ids[0]
        })
    );
    assert_eq!(list.to_text(), text);
}

#[test]
fn stale_id_resolves_to_none() {
    let (mut list, ids) = list_of(&["a", "b"]);
    list.replace(TokenRange::single(ids[0]), None).unwrap();
    assert_eq!(list.kind(ids[0]), None);
    assert_eq!(list.text(ids[0]), "");
    assert_eq!(
        list.replace(TokenRange::single(ids[0]), None),
        Err(SpliceError::Missing(ids[0]))
    );
    let fresh = list.synthesize(TokenKind::Symbol, "c", 0);
    assert_ne!(fresh, ids[0]);
}

#[test]
fn discard_destroys_detached_run() {
    let mut list = TokenList::new("");
    let new = run(&mut list, &["a", "b"]).unwrap();
    list.discard(new).unwrap();
    assert!(list.get(new.first).is_none());
    assert!(list.get(new.last).is_none());
}

#[test]
fn delete_all_destroys_every_token() {
    let (mut list, ids) = list_of(&["a", "b"]);
    let detached = list.synthesize(TokenKind::Symbol, "z", 0);
    list.delete_all();
    assert!(list.is_empty());
    assert!(list.get(ids[0]).is_none());
    assert!(list.get(detached).is_none());
}

#[test]
fn chain_of_nothing_is_none() {
    let mut list = TokenList::new("");
    assert_eq!(list.chain(&[]), Ok(None));
}

proptest! {
    /// A splice changes only the replaced region of the text.
    #[test]
    fn replace_is_local(
        words in prop::collection::vec("[a-z]{1,4}", 1..12),
        start in 0usize..12,
        count in 1usize..4,
        replacement in prop::collection::vec("[A-Z]{1,3}", 0..4),
    ) {
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        let (mut list, ids) = list_of(&words);
        let start = start % ids.len();
        let end = (start + count - 1).min(ids.len() - 1);

        let replacement: Vec<&str> = replacement.iter().map(String::as_str).collect();
        let new = run(&mut list, &replacement);
        list.replace(TokenRange::new(ids[start], ids[end]), new).unwrap();

        let mut expected = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 && !(i > start && i <= end) {
                expected.push(' ');
            }
            if i == start {
                expected.push_str(&replacement.concat());
            } else if i < start || i > end {
                expected.push_str(word);
            }
        }
        prop_assert_eq!(list.to_text(), expected);

        let walked = list.iter().count();
        prop_assert_eq!(walked, list.len());
    }
}
