use std::future::Future;

use qualis_core::enums::CollectorKind;

/// Run `f` for the selected kind, or for both kinds concurrently.
///
/// Results come back in [`CollectorKind::ALL`] order.
pub async fn for_each_kind<F, Fut, T>(kind: Option<CollectorKind>, f: F) -> Vec<(CollectorKind, T)>
where
    F: Fn(CollectorKind) -> Fut,
    Fut: Future<Output = T>,
{
    match kind {
        Some(kind) => vec![(kind, f(kind).await)],
        None => {
            let (quality, security) =
                tokio::join!(f(CollectorKind::Quality), f(CollectorKind::Security));
            vec![
                (CollectorKind::Quality, quality),
                (CollectorKind::Security, security),
            ]
        }
    }
}
