use rand::{Rng, SeedableRng, distr::Alphanumeric};
use rand_chacha::ChaCha20Rng;
use rcvalue::prelude::*;

#[test]
fn hello_world() {
    let mut heap = ValueHeap::new();
    let text = heap.create_text().unwrap();
    heap.append(text, "hello").unwrap();
    heap.append(text, " world").unwrap();
    assert_eq!(heap.read(text).unwrap(), ValueView::Text("hello world"));
    heap.release(text).unwrap();
}

#[test]
fn empty_append_keeps_content() {
    let mut heap = ValueHeap::new();
    let text = heap.create_text().unwrap();
    heap.append(text, "abc").unwrap();
    heap.append(text, "").unwrap();
    let buffer = heap.text_mut(text).unwrap();
    assert_eq!(buffer.as_str(), "abc");
    assert_eq!(buffer.len(), 3);
}

#[test]
fn appends_accumulate_under_both_policies() {
    for growth in [GrowthPolicy::ExactFit, GrowthPolicy::Amortized] {
        let mut rng = ChaCha20Rng::seed_from_u64(0xa99e);
        let mut heap = ValueHeap::with_config(HeapConfig {
            growth,
            ..HeapConfig::default()
        });
        let text = heap.create_text().unwrap();
        let mut expected = String::new();

        for _ in 0..100 {
            let len = rng.random_range(0..8);
            let piece: String = (&mut rng)
                .sample_iter(Alphanumeric)
                .take(len)
                .map(char::from)
                .collect();
            heap.append(text, &piece).unwrap();
            expected.push_str(&piece);

            let buffer = heap.text_mut(text).unwrap();
            assert_eq!(buffer.as_str(), expected);
            assert_eq!(buffer.as_bytes_with_nul().last(), Some(&0));
            assert!(buffer.capacity() >= buffer.len() + 1);
        }
        heap.release(text).unwrap();
    }
}

#[test]
fn exact_fit_tracks_content_length() {
    let mut buffer = TextBuffer::new();
    assert_eq!(buffer.capacity(), 1);

    buffer.append("hello").unwrap();
    assert_eq!(buffer.capacity(), 6);
    buffer.append(" world").unwrap();
    assert_eq!(buffer.capacity(), 12);

    for _ in 0..32 {
        buffer.append("x").unwrap();
        assert_eq!(buffer.capacity(), buffer.len() + 1);
    }
}
