//! Best-effort email notifications for parcel changes.
//!
//! Dispatch is fire-and-forget: failures are logged and reported as a
//! boolean, never propagated. Callers must not let a slow or broken
//! email provider affect the HTTP response.

use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use super::parcel::ParcelStatus;
use super::ports::{EmailMessage, Mailer};
use super::user::EmailAddress;

fn title_case(status: ParcelStatus) -> String {
    status
        .as_str()
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn wrap_body(heading: &str, banner_colour: &str, inner: &str, tracking_link: &str) -> String {
    format!(
        concat!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#,
            r#"<div style="background: {colour}; color: white; padding: 20px; text-align: center;">"#,
            "<h1>{heading}</h1></div>",
            r#"<div style="padding: 20px; background: #f9f9f9;">{inner}"#,
            r#"<p>Track your parcel at: <a href="{link}">View Details</a></p>"#,
            "</div></div>"
        ),
        colour = banner_colour,
        heading = heading,
        inner = inner,
        link = tracking_link,
    )
}

/// Notification dispatcher over an optional email provider.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
    frontend_url: String,
}

impl Notifier {
    /// Build a dispatcher. `None` disables sending; attempts are logged
    /// and reported as not delivered.
    pub fn new(mailer: Option<Arc<dyn Mailer>>, frontend_url: impl Into<String>) -> Self {
        Self {
            mailer,
            frontend_url: frontend_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Dispatcher with no provider configured.
    pub fn disabled(frontend_url: impl Into<String>) -> Self {
        Self::new(None, frontend_url)
    }

    fn tracking_link(&self, parcel_id: Uuid) -> String {
        format!("{}/parcel/{parcel_id}", self.frontend_url)
    }

    async fn dispatch(&self, message: EmailMessage) -> bool {
        let Some(mailer) = &self.mailer else {
            info!(
                to = %message.to,
                subject = %message.subject,
                "email provider unconfigured; notification skipped"
            );
            return false;
        };
        let to = message.to.clone();
        match mailer.send(message).await {
            Ok(()) => {
                info!(%to, "notification delivered");
                true
            }
            Err(err) => {
                error!(%to, error = %err, "notification delivery failed");
                false
            }
        }
    }

    /// Tell the owner their parcel status changed. Returns whether the
    /// provider accepted the message.
    pub async fn status_changed(
        &self,
        to: EmailAddress,
        parcel_id: Uuid,
        new_status: ParcelStatus,
    ) -> bool {
        let subject = format!("Parcel {parcel_id} Status Updated");
        let inner = format!(
            "<h2>Parcel Status Update</h2>\
             <p>Your parcel {parcel_id} status has been updated to: <strong>{}</strong></p>",
            title_case(new_status),
        );
        let html_body = wrap_body(
            "Delivery Update",
            "#0066FF",
            &inner,
            &self.tracking_link(parcel_id),
        );
        self.dispatch(EmailMessage {
            to,
            subject,
            html_body,
        })
        .await
    }

    /// Tell the owner their parcel's present location changed. Returns
    /// whether the provider accepted the message.
    pub async fn location_changed(
        &self,
        to: EmailAddress,
        parcel_id: Uuid,
        new_location: &str,
    ) -> bool {
        let subject = format!("Parcel {parcel_id} Location Updated");
        let inner = format!(
            "<h2>Parcel Location Update</h2>\
             <p>Your parcel {parcel_id} is now at: <strong>{new_location}</strong></p>",
        );
        let html_body = wrap_body(
            "Location Update",
            "#00D4AA",
            &inner,
            &self.tracking_link(parcel_id),
        );
        self.dispatch(EmailMessage {
            to,
            subject,
            html_body,
        })
        .await
    }
}
