//! Tests for batch module - snapshot offsets, bias ordering, commit rules.

use splice_edit::{Bias, EditBatch, EditError};

#[test]
fn test_offsets_refer_to_original_snapshot() {
    let mut batch = EditBatch::open("abcdef");
    batch.insert_right(4, "X").unwrap();
    batch.insert_right(1, "Y").unwrap();

    assert_eq!(batch.commit().unwrap(), "aYbcdXef");
}

#[test]
fn test_left_bias_precedes_right_at_same_offset() {
    let mut batch = EditBatch::open("ab");
    batch.insert(1, "R", Bias::Right).unwrap();
    batch.insert(1, "L", Bias::Left).unwrap();

    assert_eq!(batch.commit().unwrap(), "aLRb");
}

#[test]
fn test_equal_bias_keeps_append_order() {
    let mut batch = EditBatch::open("[]");
    batch
        .insert_right(1, "3")
        .unwrap()
        .insert_left(1, "1")
        .unwrap()
        .insert_right(1, "4")
        .unwrap()
        .insert_left(1, "2")
        .unwrap();

    assert_eq!(batch.commit().unwrap(), "[1234]");
}

#[test]
fn test_import_and_list_insertions_in_one_batch() {
    let source = "import { A } from './a';\nconst list = [];\n";
    let import_end = source.find('\n').unwrap();
    let list_open = source.find('[').unwrap() + 1;

    let mut batch = EditBatch::open(source);
    batch
        .insert_left(list_open, "Foo")
        .unwrap()
        .insert_left(import_end, "\nimport { Foo } from './foo';")
        .unwrap();

    assert_eq!(
        batch.commit().unwrap(),
        "import { A } from './a';\nimport { Foo } from './foo';\nconst list = [Foo];\n"
    );
}

#[test]
fn test_offset_past_end_rejected() {
    let mut batch = EditBatch::open("abc");
    batch.insert_right(10, "x").unwrap();

    let err = batch.commit().unwrap_err();
    assert!(matches!(err, EditError::OffsetOutOfRange { offset: 10, len: 3 }));
}

#[test]
fn test_offset_inside_character_rejected() {
    let mut batch = EditBatch::open("é");
    batch.insert_right(1, "x").unwrap();

    assert!(matches!(
        batch.commit(),
        Err(EditError::OffsetOutOfRange { offset: 1, len: 2 })
    ));
}

#[test]
fn test_double_commit() {
    let mut batch = EditBatch::open("<body></body>");
    batch.insert_right(6, "<p></p>").unwrap();

    let first = batch.commit().unwrap();
    assert_eq!(first, "<body><p></p></body>");
    assert!(batch.is_committed());

    assert!(matches!(batch.commit(), Err(EditError::DoubleCommit)));
    assert_eq!(batch.original(), "<body></body>");
}

#[test]
fn test_insert_after_commit_rejected() {
    let mut batch = EditBatch::open("x");
    batch.commit().unwrap();

    assert!(matches!(batch.insert_right(0, "y"), Err(EditError::BatchClosed)));
    assert!(matches!(batch.remove_all(), Err(EditError::BatchClosed)));
}

#[test]
fn test_remove_all() {
    let mut batch = EditBatch::open("export const x = 1;\n");
    batch.remove_all().unwrap();

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.commit().unwrap(), "");
}

#[test]
fn test_remove_all_conflicts_with_insertions() {
    let mut batch = EditBatch::open("abc");
    batch.insert_right(0, "x").unwrap();
    assert!(matches!(batch.remove_all(), Err(EditError::ConflictingOperations)));

    let mut batch = EditBatch::open("abc");
    batch.remove_all().unwrap();
    assert!(matches!(
        batch.insert_left(0, "x"),
        Err(EditError::ConflictingOperations)
    ));
}

#[test]
fn test_operations_are_recorded_in_append_order() {
    let mut batch = EditBatch::open("abc");
    batch.insert_right(2, "b").unwrap().insert_left(0, "a").unwrap();

    let offsets: Vec<usize> = batch.operations().iter().map(|op| op.offset).collect();
    assert_eq!(offsets, vec![2, 0]);
    assert_eq!(batch.operations()[1].bias, Bias::Left);
    assert!(!batch.is_empty());
}

#[test]
fn test_range_removal_with_insertions_at_its_ends() {
    let mut batch = EditBatch::open("import { type Foo } from './foo';");
    batch
        .remove(9, 14)
        .unwrap()
        .insert_left(9, "A, ")
        .unwrap()
        .insert_right(17, ", B")
        .unwrap();

    assert_eq!(batch.commit().unwrap(), "import { A, Foo, B } from './foo';");
}

#[test]
fn test_range_removal_conflicts() {
    let mut batch = EditBatch::open("abcdef");
    batch.remove(1, 4).unwrap();
    assert!(matches!(batch.insert_left(2, "x"), Err(EditError::ConflictingOperations)));
    assert!(matches!(batch.remove(3, 5), Err(EditError::ConflictingOperations)));
    assert!(matches!(batch.remove_all(), Err(EditError::ConflictingOperations)));
    batch.remove(4, 6).unwrap();

    assert_eq!(batch.commit().unwrap(), "a");
}

#[test]
fn test_range_removal_past_end_rejected() {
    let mut batch = EditBatch::open("abc");
    batch.remove(1, 9).unwrap();
    assert!(matches!(
        batch.commit(),
        Err(EditError::OffsetOutOfRange { offset: 9, len: 3 })
    ));
    assert!(matches!(
        EditBatch::open("abc").remove(2, 1),
        Err(EditError::OffsetOutOfRange { .. })
    ));
}
