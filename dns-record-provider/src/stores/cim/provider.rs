//! CIM RecordStore trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::shell_client::{ScriptOutput, ShellUtils};
use crate::traits::{ErrorContext, RecordStore, StoreErrorMapper};
use crate::types::{ARecordSpec, PtrRecordSpec, RecordFilter, RecordKind, StoredRecord};

use super::error::raw_error;
use super::{CimRecordStore, CimRows, script};

impl CimRecordStore {
    /// 执行脚本，失败时映射为统一错误
    async fn run(
        &self,
        server: &str,
        action: &str,
        script: &str,
        context: ErrorContext,
    ) -> Result<ScriptOutput> {
        let output = ShellUtils::execute_script(&self.shell, script, server, action).await?;
        if output.success {
            Ok(output)
        } else {
            Err(self.map_error(raw_error(&output.stderr), context))
        }
    }

    /// 解析 `ConvertTo-Json` 输出；无记录时输出可能为空
    fn parse_rows(output: &str, server: &str, kind: RecordKind) -> Result<Vec<StoredRecord>> {
        if output.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: CimRows = ShellUtils::parse_json(output, server)?;
        Ok(rows
            .into_vec()
            .into_iter()
            .map(|row| row.into_record(kind))
            .collect())
    }
}

#[async_trait]
impl RecordStore for CimRecordStore {
    fn id(&self) -> &'static str {
        "cim"
    }

    async fn create_a_record(&self, server: &str, spec: &ARecordSpec) -> Result<()> {
        let script = script::create_a_script(server, spec);
        self.run(
            server,
            "CreateA",
            &script,
            ErrorContext::server(server)
                .zone(&spec.zone)
                .owner(&spec.owner),
        )
        .await?;
        Ok(())
    }

    async fn delete_a_record(&self, server: &str, owner: &str) -> Result<u32> {
        let filter = RecordFilter::owned_by(RecordKind::A, owner);
        let script = script::delete_script(server, &filter);
        let output = self
            .run(
                server,
                "DeleteA",
                &script,
                ErrorContext::server(server).owner(owner),
            )
            .await?;
        ShellUtils::parse_count(&output.stdout, server)
    }

    async fn create_ptr_record(&self, server: &str, spec: &PtrRecordSpec) -> Result<()> {
        let script = script::create_ptr_script(server, spec);
        self.run(
            server,
            "CreatePTR",
            &script,
            ErrorContext::server(server)
                .zone(&spec.zone)
                .owner(&spec.owner),
        )
        .await?;
        Ok(())
    }

    async fn delete_ptr_record(&self, server: &str, owner: &str, target: &str) -> Result<u32> {
        let filter = RecordFilter::owned_by(RecordKind::Ptr, owner).with_data(target);
        let script = script::delete_script(server, &filter);
        let output = self
            .run(
                server,
                "DeletePTR",
                &script,
                ErrorContext::server(server).owner(owner),
            )
            .await?;
        ShellUtils::parse_count(&output.stdout, server)
    }

    async fn query_records(
        &self,
        server: &str,
        filter: &RecordFilter,
    ) -> Result<Vec<StoredRecord>> {
        let script = script::query_script(server, filter);
        let output = self
            .run(
                server,
                "Query",
                &script,
                ErrorContext::server(server).owner(&filter.owner),
            )
            .await?;
        Self::parse_rows(&output.stdout, server, filter.kind)
    }
}
