use sea_battle::{BitBoard, BitBoardError};

#[test]
fn test_bounds() {
    let mut bb = BitBoard::<u64>::new(10);
    assert_eq!(bb.size(), 10);
    assert!(bb.is_empty());
    assert_eq!(
        bb.set(10, 0),
        Err(BitBoardError::IndexOutOfBounds { row: 10, col: 0 })
    );
    assert!(matches!(bb.get(0, 10), Err(BitBoardError::IndexOutOfBounds { .. })));
    assert!(!bb.contains(42, 42));
}

#[test]
fn test_get_set_spanning_words() {
    // 12×12 = 144 bits, more than two u64 words
    let mut bb = BitBoard::<u64>::new(12);
    assert!(bb.set(0, 0).unwrap());
    assert!(bb.set(5, 4).unwrap());
    assert!(bb.set(11, 11).unwrap());
    assert!(!bb.set(11, 11).unwrap(), "second set reports no change");
    assert!(bb.get(5, 4).unwrap());
    assert!(!bb.get(4, 5).unwrap());
    assert_eq!(bb.count_ones(), 3);

    bb.clear_all();
    assert!(bb.is_empty());
}

#[test]
fn test_small_words() {
    let mut bb = BitBoard::<u8>::new(4);
    bb.set(3, 3).unwrap();
    bb.set(1, 2).unwrap();
    assert_eq!(bb.iter_set_bits().collect::<Vec<_>>(), vec![(1, 2), (3, 3)]);
}

#[test]
fn test_from_iter_and_set_algebra() {
    let a = BitBoard::<u64>::from_iter(4, [(0, 1), (3, 3)]).unwrap();
    let b = BitBoard::<u64>::from_iter(4, [(0, 1), (2, 2)]).unwrap();
    let c = BitBoard::<u64>::from_iter(4, [(1, 1)]).unwrap();

    let union = &a | &b;
    assert_eq!(union.iter_set_bits().collect::<Vec<_>>(), vec![(0, 1), (2, 2), (3, 3)]);
    let both = &a & &b;
    assert_eq!(both.iter_set_bits().collect::<Vec<_>>(), vec![(0, 1)]);

    assert!(!a.is_disjoint(&b));
    assert!(a.is_disjoint(&c));
    assert!(a.is_subset(&union));
    assert!(!union.is_subset(&a));
    assert!(BitBoard::<u64>::from_iter(4, [(9, 9)]).is_err());
}
