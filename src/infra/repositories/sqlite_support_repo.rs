use crate::domain::{
    models::support::{SupportMessage, SupportMessageRow, SupportTicket},
    ports::SupportRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteSupportRepo {
    pool: SqlitePool,
}

impl SqliteSupportRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn into_message(row: SupportMessageRow) -> Result<SupportMessage, AppError> {
    SupportMessage::try_from(row).map_err(|e| {
        error!("Corrupt support message row: {}", e);
        AppError::InternalWithMsg(e)
    })
}

#[async_trait]
impl SupportRepository for SqliteSupportRepo {
    async fn create_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "INSERT INTO support_tickets (id, tenant_id, subject, message, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&ticket.id)
            .bind(&ticket.tenant_id)
            .bind(&ticket.subject)
            .bind(&ticket.message)
            .bind(&ticket.status)
            .bind(ticket.created_at)
            .bind(ticket.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_ticket(&self, id: &str) -> Result<Option<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_tickets(&self) -> Result<Vec<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_tickets_by_tenant(&self, tenant_id: &str) -> Result<Vec<SupportTicket>, AppError> {
        sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE tenant_id = ? ORDER BY created_at DESC")
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update_ticket(&self, ticket: &SupportTicket) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(
            "UPDATE support_tickets SET subject=?, message=?, status=?, updated_at=? WHERE id=? RETURNING *"
        )
            .bind(&ticket.subject)
            .bind(&ticket.message)
            .bind(&ticket.status)
            .bind(Utc::now())
            .bind(&ticket.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_ticket(&self, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM support_messages WHERE ticket_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM support_tickets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_message(&self, message: &SupportMessage) -> Result<SupportMessage, AppError> {
        let row = sqlx::query_as::<_, SupportMessageRow>(
            "INSERT INTO support_messages (id, ticket_id, sender_kind, sender_id, sender_name, sender_email, content, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&message.id)
            .bind(&message.ticket_id)
            .bind(message.sender.kind.as_str())
            .bind(&message.sender.id)
            .bind(&message.sender.name)
            .bind(&message.sender.email)
            .bind(&message.content)
            .bind(message.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        into_message(row)
    }

    async fn list_messages(&self, ticket_id: &str) -> Result<Vec<SupportMessage>, AppError> {
        let rows = sqlx::query_as::<_, SupportMessageRow>(
            "SELECT * FROM support_messages WHERE ticket_id = ? ORDER BY created_at ASC"
        )
            .bind(ticket_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;
        rows.into_iter().map(into_message).collect()
    }
}
