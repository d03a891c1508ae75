use super::*;

#[test]
fn missing_title_falls_back_to_kind_default() {
    let queue = ToastQueue::default();

    queue.push(ToastKind::Success, None, "saved");
    queue.push(ToastKind::Error, None, "broken");
    queue.push(ToastKind::Info, None, "fyi");
    queue.push(ToastKind::Warning, Some("Heads Up"), "careful");

    let titles: Vec<String> = queue.active().into_iter().map(|toast| toast.title).collect();
    assert_eq!(
        titles,
        ["✓ Success", "✗ Error", "ℹ Information", "Heads Up"]
    );
}

#[test]
fn toasts_stack_without_a_runtime() {
    let queue = ToastQueue::new(Duration::from_millis(1));
    let first = queue.push(ToastKind::Info, None, "one");
    let second = queue.push(ToastKind::Info, None, "two");

    assert_ne!(first, second);
    assert_eq!(queue.len(), 2);
    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(queue.len(), 2, "no runtime means no timed dismissal");
}

#[test]
fn manual_dismiss_removes_once() {
    let queue = ToastQueue::default();
    let id = queue.push(ToastKind::Error, Some("Oops"), "bad");

    assert!(queue.dismiss(id));
    assert!(!queue.dismiss(id));
    assert!(queue.is_empty());
}

#[test]
fn clones_share_the_same_queue() {
    let queue = ToastQueue::default();
    let handle = queue.clone();
    handle.push(ToastKind::Success, None, "shared");
    assert_eq!(queue.active()[0].message, "shared");
}

#[tokio::test(start_paused = true)]
async fn toast_expires_after_dismiss_delay() {
    let queue = ToastQueue::default();
    queue.push(ToastKind::Success, None, "done");

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(queue.len(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn each_toast_keeps_its_own_timer() {
    let queue = ToastQueue::new(Duration::from_secs(5));
    queue.push(ToastKind::Info, None, "early");
    tokio::time::sleep(Duration::from_secs(3)).await;
    queue.push(ToastKind::Info, None, "late");

    tokio::time::sleep(Duration::from_secs(3)).await;
    let left: Vec<String> = queue.active().into_iter().map(|toast| toast.message).collect();
    assert_eq!(left, ["late"]);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn dismissed_toast_timer_is_harmless() {
    let queue = ToastQueue::new(Duration::from_secs(1));
    let id = queue.push(ToastKind::Warning, None, "gone early");
    assert!(queue.dismiss(id));
    let other = queue.push(ToastKind::Warning, None, "stays for now");

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!queue.dismiss(other));
}
