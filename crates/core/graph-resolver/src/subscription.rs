// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Bridge between subscription fields and the pub/sub channels they listen to.

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use tracing::{debug, instrument};

use graph_model::{error::FieldError, source::ResolveInfo, value::Val};
use graph_pubsub::PubSub;

/// Stream the messages published to the channel named after the host field name.
///
/// The channel is subscribed to immediately, so messages published after this call returns are
/// delivered. Each message goes through the root's `on_message` handler for the field, if there
/// is one. The stream ends when the channel is closed; dropping it releases the subscription.
#[instrument(skip_all, fields(channel = info.field_name.as_str()))]
pub fn subscribe_field(
    pubsub: &PubSub,
    root: Val,
    info: ResolveInfo,
) -> impl Stream<Item = Result<Val, FieldError>> + Send + 'static {
    let mut subscription = pubsub.subscribe(&info.field_name);
    debug!("Subscribed");

    try_stream! {
        while let Some(message) = subscription.next().await {
            let handler = match &root {
                Val::Source(source) => {
                    source
                        .clone()
                        .on_message(&info.field_name, info.clone(), message.clone())
                }
                _ => None,
            };

            let value = match handler {
                Some(handler) => handler.await?.into_val().await?,
                None => message,
            };

            yield value;
        }
    }
}
