use super::*;
use crate::config::Config;
use crate::decision::RejectionKind;
use crate::types::{Album, Artist, ArtistId, ReleaseInfo, RemoteAlbum};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted download client. Pops the next scripted response per fetch and
/// records every call; defaults to success once the script is exhausted.
struct MockClient {
    responses: Mutex<VecDeque<Result<(), FetchError>>>,
    calls: Mutex<Vec<(String, DownloadProtocol)>>,
}

impl MockClient {
    fn succeeding() -> Arc<Self> {
        Self::with_responses(vec![])
    }

    fn with_responses(responses: Vec<Result<(), FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::from(responses)),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls_for(&self, protocol: DownloadProtocol) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, p)| *p == protocol)
            .count()
    }
}

#[async_trait]
impl DownloadClient for MockClient {
    async fn fetch(&self, remote: &RemoteAlbum) -> Result<(), FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((remote.release.title.clone(), remote.release.protocol));
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Client that cancels the supplied token from inside the first fetch.
struct CancellingClient {
    token: CancellationToken,
    inner: Arc<MockClient>,
}

#[async_trait]
impl DownloadClient for CancellingClient {
    async fn fetch(&self, remote: &RemoteAlbum) -> Result<(), FetchError> {
        self.token.cancel();
        self.inner.fetch(remote).await
    }
}

/// Pending queue that records every batch it receives.
struct RecordingPendingQueue {
    batches: Mutex<Vec<Vec<PendingItem>>>,
}

impl RecordingPendingQueue {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(Vec::new()),
        })
    }

    fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl PendingQueue for RecordingPendingQueue {
    async fn add_batch(&self, items: Vec<PendingItem>) -> crate::Result<()> {
        self.batches.lock().unwrap().push(items);
        Ok(())
    }
}

fn album(id: i64) -> Album {
    Album {
        id: AlbumId::new(id),
        title: format!("Album {id}"),
    }
}

fn remote_album(title: &str, albums: Vec<Album>, protocol: DownloadProtocol) -> RemoteAlbum {
    let mut remote = RemoteAlbum::new(ReleaseInfo {
        guid: format!("guid-{title}"),
        title: title.to_string(),
        indexer_id: 1,
        indexer: "test-indexer".into(),
        protocol,
        publish_date: Some(chrono::Utc::now()),
        size: 350 << 20,
        download_url: Some("https://indexer.example/dl/1".into()),
        info: None,
    });
    remote.artist = Some(Artist {
        id: ArtistId::new(7),
        name: "Artist".into(),
    });
    remote.albums = albums;
    remote.download_allowed = true;
    remote
}

fn approved(title: &str, album_ids: &[i64]) -> Decision {
    approved_on(title, album_ids, DownloadProtocol::Usenet)
}

fn approved_on(title: &str, album_ids: &[i64], protocol: DownloadProtocol) -> Decision {
    Decision::approved(remote_album(
        title,
        album_ids.iter().map(|&id| album(id)).collect(),
        protocol,
    ))
}

fn temporarily_rejected(title: &str, album_ids: &[i64]) -> Decision {
    Decision::rejected(
        remote_album(
            title,
            album_ids.iter().map(|&id| album(id)).collect(),
            DownloadProtocol::Usenet,
        ),
        Rejection::temporary("minimum delay not elapsed"),
    )
}

fn permanently_rejected(title: &str, album_ids: &[i64]) -> Decision {
    Decision::rejected(
        remote_album(
            title,
            album_ids.iter().map(|&id| album(id)).collect(),
            DownloadProtocol::Usenet,
        ),
        Rejection::permanent("quality not wanted"),
    )
}

fn orchestrator(
    client: Arc<MockClient>,
    queue: Arc<RecordingPendingQueue>,
) -> GrabOrchestrator {
    GrabOrchestrator::new(client, queue, &Config::default())
}

#[tokio::test]
async fn test_grabs_release_when_album_not_already_grabbed() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject.process(vec![approved("Artist - Album 1", &[1])]).await;

    assert_eq!(client.call_count(), 1);
    assert_eq!(result.grabbed.len(), 1);
    assert!(result.satisfied.contains(&AlbumId::new(1)));
}

#[tokio::test]
async fn test_only_grabs_album_once() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            approved("Artist - Album 1 PROPER", &[1]),
        ])
        .await;

    assert_eq!(client.call_count(), 1);
    assert_eq!(result.grabbed.len(), 1);
    // the duplicate is skipped entirely: neither grabbed nor rejected
    assert!(result.rejected.is_empty());
    assert!(result.pending.is_empty());
}

#[tokio::test]
async fn test_skips_decision_when_any_album_already_grabbed() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            approved("Artist - Albums 1+2", &[1, 2]),
        ])
        .await;

    assert_eq!(client.call_count(), 1);
    assert_eq!(result.grabbed.len(), 1);
}

#[tokio::test]
async fn test_grabs_all_disjoint_approved_decisions() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            approved("Artist - Album 2", &[2]),
            approved("Artist - Album 3", &[3]),
        ])
        .await;

    assert_eq!(result.grabbed.len(), 3);
    assert_eq!(client.call_count(), 3);
    assert_eq!(result.satisfied.len(), 3);
}

#[tokio::test]
async fn test_failed_grab_is_rejected_not_grabbed() {
    let client = MockClient::with_responses(vec![Err(FetchError::Other("boom".into()))]);
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject.process(vec![approved("Artist - Album 1", &[1])]).await;

    assert!(result.grabbed.is_empty());
    assert_eq!(result.rejected.len(), 1);
    assert!(!result.satisfied.contains(&AlbumId::new(1)));

    // the fault is converted into a rejection so the reason reaches the UI
    let rejected = &result.rejected[0];
    assert!(!rejected.is_approved());
    assert_eq!(rejected.rejections.len(), 1);
    assert_eq!(rejected.rejections[0].kind, RejectionKind::Permanent);
    assert!(rejected.rejections[0].reason.contains("boom"));
}

#[tokio::test]
async fn test_permanent_rejections_go_to_rejected_without_fetch() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue.clone());

    let result = subject
        .process(vec![
            permanently_rejected("Artist - Album 1", &[1]),
            permanently_rejected("Artist - Album 2", &[2]),
        ])
        .await;

    assert_eq!(client.call_count(), 0);
    assert_eq!(result.rejected.len(), 2);
    assert_eq!(queue.batch_count(), 0);
}

#[tokio::test]
async fn test_temporary_rejection_is_pended_not_fetched() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue.clone());

    let result = subject
        .process(vec![temporarily_rejected("Artist - Album 1", &[1])])
        .await;

    assert_eq!(client.call_count(), 0);
    assert_eq!(result.pending.len(), 1);
    assert_eq!(queue.batch_sizes(), vec![1]);
}

#[tokio::test]
async fn test_does_not_pend_album_that_was_grabbed_this_run() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue.clone());

    let result = subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            temporarily_rejected("Artist - Album 1 REPACK", &[1]),
        ])
        .await;

    assert_eq!(result.grabbed.len(), 1);
    assert!(result.pending.is_empty());
    assert_eq!(queue.batch_count(), 0);
}

#[tokio::test]
async fn test_pends_release_even_when_already_pending() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client, queue.clone());

    let result = subject
        .process(vec![
            temporarily_rejected("Artist - Album 1", &[1]),
            temporarily_rejected("Artist - Album 1 PROPER", &[1]),
        ])
        .await;

    assert_eq!(result.pending.len(), 2);
    // still a single batched write
    assert_eq!(queue.batch_sizes(), vec![2]);
}

#[tokio::test]
async fn test_pending_writes_are_batched_into_one_call() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client, queue.clone());

    let decisions: Vec<Decision> = (1..=5)
        .map(|i| temporarily_rejected(&format!("Artist - Album {i}"), &[i]))
        .collect();

    let result = subject.process(decisions).await;

    assert_eq!(result.pending.len(), 5);
    assert_eq!(queue.batch_sizes(), vec![5]);
}

#[tokio::test]
async fn test_client_unavailable_trips_breaker_for_protocol() {
    let client = MockClient::with_responses(vec![Err(FetchError::ClientUnavailable(
        "connection refused".into(),
    ))]);
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            approved("Artist - Album 2", &[2]),
            approved("Artist - Album 3", &[3]),
        ])
        .await;

    // only the first decision ever reaches the client
    assert_eq!(client.call_count(), 1);
    assert!(result.grabbed.is_empty());
    // "we didn't try" is not a rejection
    assert!(result.rejected.is_empty());
}

#[tokio::test]
async fn test_breaker_does_not_affect_other_protocol() {
    let client = MockClient::with_responses(vec![
        Err(FetchError::ClientUnavailable("connection refused".into())),
        Ok(()),
    ]);
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved_on("Artist - Album 1", &[1], DownloadProtocol::Usenet),
            approved_on("Artist - Album 2", &[2], DownloadProtocol::Torrent),
            approved_on("Artist - Album 3", &[3], DownloadProtocol::Usenet),
        ])
        .await;

    assert_eq!(client.calls_for(DownloadProtocol::Usenet), 1);
    assert_eq!(client.calls_for(DownloadProtocol::Torrent), 1);
    assert_eq!(result.grabbed.len(), 1);
    assert_eq!(
        result.grabbed[0].remote_album.release.protocol,
        DownloadProtocol::Torrent
    );
}

#[tokio::test]
async fn test_release_unavailable_is_rejected_with_reason() {
    let client = MockClient::with_responses(vec![Err(FetchError::ReleaseUnavailable(
        "indexer returned 404".into(),
    ))]);
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client, queue);

    let result = subject.process(vec![approved("Artist - Album 1", &[1])]).await;

    assert!(result.grabbed.is_empty());
    assert_eq!(result.rejected.len(), 1);
    let rejection = &result.rejected[0].rejections[0];
    assert_eq!(rejection.kind, RejectionKind::Permanent);
    assert!(rejection.reason.contains("404"));
}

#[tokio::test]
async fn test_every_decision_is_accounted_for() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client, queue);

    let decisions = vec![
        approved("Artist - Album 1", &[1]),
        approved("Artist - Album 1 PROPER", &[1]), // skipped duplicate
        temporarily_rejected("Artist - Album 2", &[2]),
        permanently_rejected("Artist - Album 3", &[3]),
        approved("Artist - Album 4", &[4]),
    ];
    let input_len = decisions.len();

    let result = subject.process(decisions).await;

    let routed = result.grabbed.len() + result.pending.len() + result.rejected.len();
    let skipped_duplicates = 1;
    assert_eq!(routed + skipped_duplicates, input_len);
}

#[tokio::test]
async fn test_cancellation_yields_partial_result() {
    let inner = MockClient::succeeding();
    let token = CancellationToken::new();
    let client = Arc::new(CancellingClient {
        token: token.clone(),
        inner: inner.clone(),
    });
    let queue = RecordingPendingQueue::new();
    let subject = GrabOrchestrator::new(client, queue, &Config::default());

    let result = subject
        .process_cancellable(
            vec![
                approved("Artist - Album 1", &[1]),
                approved("Artist - Album 2", &[2]),
            ],
            &token,
        )
        .await;

    // the first grab completed before cancellation and is not lost
    assert_eq!(result.grabbed.len(), 1);
    assert_eq!(inner.call_count(), 1);
}

#[tokio::test]
async fn test_precancelled_batch_processes_nothing() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let token = CancellationToken::new();
    token.cancel();

    let result = subject
        .process_cancellable(vec![approved("Artist - Album 1", &[1])], &token)
        .await;

    assert!(result.grabbed.is_empty());
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_events_are_emitted_for_each_route() {
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client, queue);
    let mut events = subject.subscribe();

    subject
        .process(vec![
            approved("Artist - Album 1", &[1]),
            temporarily_rejected("Artist - Album 2", &[2]),
            permanently_rejected("Artist - Album 3", &[3]),
        ])
        .await;

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }

    assert!(seen.iter().any(|e| matches!(e, Event::ReleaseGrabbed { .. })));
    assert!(seen.iter().any(|e| matches!(e, Event::ReleasePended { .. })));
    assert!(seen.iter().any(|e| matches!(e, Event::ReleaseRejected { .. })));
}

#[tokio::test]
async fn test_decision_with_no_albums_is_not_deduped() {
    // approved decisions with empty album sets must not match the
    // "already satisfied" check
    let client = MockClient::succeeding();
    let queue = RecordingPendingQueue::new();
    let subject = orchestrator(client.clone(), queue);

    let result = subject
        .process(vec![
            approved("Artist - Unknown 1", &[]),
            approved("Artist - Unknown 2", &[]),
        ])
        .await;

    assert_eq!(client.call_count(), 2);
    assert_eq!(result.grabbed.len(), 2);
}
