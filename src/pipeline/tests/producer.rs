//! Producer behaviour tests: ordering, timeouts, error policy and stop.

#[cfg(test)]
mod tests {
    use crate::pipeline::{
        Item, PipelineError, Producer, ProducerConfig, ErrorPolicy, TrySource,
    };
    use crate::queue::{BoundedQueue, ItemQueue};
    use serial_test::serial;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn unbounded() -> Arc<dyn ItemQueue<Item<i32>>> {
        Arc::new(BoundedQueue::unbounded())
    }

    fn drain(queue: &Arc<dyn ItemQueue<Item<i32>>>) -> Vec<Item<i32>> {
        let mut items = Vec::new();
        while let Ok(item) = queue.try_get() {
            items.push(item);
        }
        items
    }

    #[test]
    fn test_produces_source_in_order_without_sentinel() {
        let queue = unbounded();
        let mut producer = Producer::from_vec(
            ProducerConfig::new("producer-order"),
            (0..10).collect(),
            Arc::clone(&queue),
        );

        producer.start().unwrap();
        let metrics = producer.join(None).expect("producer should finish");

        assert_eq!(metrics.items, 10);
        assert_eq!(metrics.errors, 0);
        assert!(metrics.clean_exit);

        // Source order preserved, and no end-of-stream marker: the
        // coordinator owns sentinel delivery, not the producer.
        let produced = drain(&queue);
        assert_eq!(
            produced,
            (0..10).map(Item::Payload).collect::<Vec<Item<i32>>>()
        );
    }

    #[test]
    #[serial]
    fn test_put_timeout_with_abort_policy() {
        let queue: Arc<dyn ItemQueue<Item<i32>>> = Arc::new(BoundedQueue::new(1));
        // Pre-fill so the first put can never succeed; nobody consumes.
        queue.put(Item::Payload(99)).unwrap();

        let config = ProducerConfig::new("producer-abort")
            .with_put_timeout(Some(Duration::from_millis(50)));
        let mut producer = Producer::from_vec(config, vec![1, 2, 3], Arc::clone(&queue));

        producer.start().unwrap();
        let metrics = producer.join(None).expect("producer should finish");

        assert_eq!(metrics.items, 0);
        assert_eq!(metrics.errors, 1);
        assert!(!metrics.clean_exit, "abort policy is not a clean exit");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    #[serial]
    fn test_put_timeout_with_skip_policy_drops_items() {
        let queue: Arc<dyn ItemQueue<Item<i32>>> = Arc::new(BoundedQueue::new(1));
        queue.put(Item::Payload(99)).unwrap();

        let config = ProducerConfig::new("producer-skip")
            .with_put_timeout(Some(Duration::from_millis(20)))
            .with_error_policy(ErrorPolicy::Skip);
        let mut producer = Producer::from_vec(config, vec![1, 2, 3], Arc::clone(&queue));

        producer.start().unwrap();
        let metrics = producer.join(None).expect("producer should finish");

        // Every item timed out and was skipped; the source was exhausted.
        assert_eq!(metrics.items, 0);
        assert_eq!(metrics.errors, 3);
        assert!(metrics.clean_exit);
    }

    #[test]
    fn test_source_error_with_skip_policy() {
        let queue = unbounded();
        let source = TrySource::new(vec![
            Ok(1),
            Err("malformed record".to_string()),
            Ok(2),
        ]);
        let config = ProducerConfig::new("producer-source-skip")
            .with_error_policy(ErrorPolicy::Skip);
        let mut producer = Producer::new(config, Box::new(source), Arc::clone(&queue));

        producer.start().unwrap();
        let metrics = producer.join(None).expect("producer should finish");

        assert_eq!(metrics.items, 2);
        assert_eq!(metrics.errors, 1);
        assert!(metrics.clean_exit);
        assert_eq!(drain(&queue), vec![Item::Payload(1), Item::Payload(2)]);
    }

    #[test]
    fn test_source_error_with_abort_policy() {
        let queue = unbounded();
        let source = TrySource::new(vec![
            Ok(1),
            Err("malformed record".to_string()),
            Ok(2),
        ]);
        let mut producer = Producer::new(
            ProducerConfig::new("producer-source-abort"),
            Box::new(source),
            Arc::clone(&queue),
        );

        producer.start().unwrap();
        let metrics = producer.join(None).expect("producer should finish");

        assert_eq!(metrics.items, 1);
        assert_eq!(metrics.errors, 1);
        assert!(!metrics.clean_exit);
        assert_eq!(drain(&queue), vec![Item::Payload(1)]);
    }

    #[test]
    #[serial]
    fn test_stop_interrupts_production() {
        let queue = unbounded();
        let config = ProducerConfig::new("producer-stopped")
            .with_delay(Some(Duration::from_millis(10)));
        let mut producer =
            Producer::from_vec(config, (0..1000).collect(), Arc::clone(&queue));

        producer.start().unwrap();
        assert!(producer.is_running());
        thread::sleep(Duration::from_millis(60));
        producer.stop();

        let metrics = producer.join(None).expect("producer should finish");
        assert!(metrics.items < 1000, "stop should cut production short");
        assert!(!metrics.clean_exit);
        assert!(!producer.is_running());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let queue = unbounded();
        let mut producer =
            Producer::from_vec(ProducerConfig::new("producer-twice"), vec![1], queue);

        producer.start().unwrap();
        let second = producer.start();
        assert!(matches!(
            second,
            Err(PipelineError::AlreadyRunning { .. })
        ));
        producer.join(None);
    }

    #[test]
    #[serial]
    fn test_join_timeout_leaves_thread_running() {
        let queue: Arc<dyn ItemQueue<Item<i32>>> = Arc::new(BoundedQueue::new(1));
        queue.put(Item::Payload(0)).unwrap();

        // Blocking put with no timeout: the producer is stuck until a get.
        let mut producer = Producer::from_vec(
            ProducerConfig::new("producer-stuck"),
            vec![1],
            Arc::clone(&queue),
        );
        producer.start().unwrap();

        assert!(producer.join(Some(Duration::from_millis(50))).is_none());
        assert!(producer.is_running());

        // Free the capacity; the same producer can then be joined.
        assert_eq!(queue.get().unwrap(), Item::Payload(0));
        let metrics = producer
            .join(Some(Duration::from_secs(5)))
            .expect("producer should finish once unblocked");
        assert_eq!(metrics.items, 1);
        assert!(metrics.clean_exit);
    }
}
