use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use hypersim_core::stream::{StreamSink, StreamSource};
use mockall::mock;

mock! {
    pub Source {}
    impl StreamSource for Source {
        fn valid(&self) -> bool;
        fn peek(&self) -> u32;
        fn pop(&mut self);
    }
}

mock! {
    pub Sink {}
    impl StreamSink for Sink {
        fn ready(&self) -> bool;
        fn push(&mut self, word: u32);
    }
}

/// A mock source scripted to yield `words` in order, then go invalid.
/// The returned queue handle exposes the words not yet consumed.
pub fn scripted_source(words: Vec<u32>) -> (MockSource, Rc<RefCell<VecDeque<u32>>>) {
    let queue = Rc::new(RefCell::new(VecDeque::from(words)));
    let mut source = MockSource::new();

    let q = Rc::clone(&queue);
    source
        .expect_valid()
        .returning_st(move || !q.borrow().is_empty());
    let q = Rc::clone(&queue);
    source
        .expect_peek()
        .returning_st(move || q.borrow().front().copied().unwrap_or(0));
    let q = Rc::clone(&queue);
    source.expect_pop().returning_st(move || {
        let _ = q.borrow_mut().pop_front();
    });

    (source, queue)
}

/// A mock sink that is always ready and records everything pushed.
pub fn recording_sink() -> (MockSink, Rc<RefCell<Vec<u32>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut sink = MockSink::new();

    sink.expect_ready().returning(|| true);
    let s = Rc::clone(&seen);
    sink.expect_push().returning_st(move |word| {
        s.borrow_mut().push(word);
    });

    (sink, seen)
}
