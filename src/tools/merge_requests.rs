use super::tool;
use rmcp::model::Tool;
use serde_json::json;

pub fn tools() -> Vec<Tool> {
    vec![
        tool(
            "list_merge_requests",
            "List merge requests in a project",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "state": {
                        "type": "string",
                        "enum": ["opened", "closed", "merged", "all"],
                        "description": "Filter by merge request state",
                        "default": "opened"
                    },
                    "target_branch": {
                        "type": "string",
                        "description": "Filter by target branch"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Filter by source branch"
                    },
                    "assignee_id": {
                        "type": "number",
                        "description": "Filter by assignee user ID"
                    },
                    "author_id": {
                        "type": "number",
                        "description": "Filter by author user ID"
                    },
                    "reviewer_id": {
                        "type": "number",
                        "description": "Filter by reviewer user ID"
                    },
                    "reviewer_username": {
                        "type": "string",
                        "description": "Filter by reviewer username"
                    },
                    "search": {
                        "type": "string",
                        "description": "Search merge requests by title and description"
                    },
                    "scope": {
                        "type": "string",
                        "enum": ["created_by_me", "assigned_to_me", "all"],
                        "description": "Return merge requests with the given scope (optional)"
                    },
                    "per_page": {
                        "type": "number",
                        "description": "Number of results per page (max 100)",
                        "maximum": 100,
                        "default": 20
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "get_merge_request",
            "Get details of a specific merge request, identified either by its IID or by its source branch",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID (either this or source_branch is required)"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Source branch name, used to look up the merge request when merge_request_iid is omitted"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "create_merge_request",
            "Create a new merge request",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "title": {
                        "type": "string",
                        "description": "Merge request title"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Source branch name"
                    },
                    "target_branch": {
                        "type": "string",
                        "description": "Target branch name"
                    },
                    "description": {
                        "type": "string",
                        "description": "Merge request description"
                    },
                    "assignee_ids": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Array of user IDs to assign"
                    },
                    "reviewer_ids": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Array of user IDs to review"
                    },
                    "labels": {
                        "type": "string",
                        "description": "Comma-separated list of labels"
                    },
                    "milestone_id": {
                        "type": "number",
                        "description": "Milestone ID"
                    }
                },
                "required": ["project_id", "title", "source_branch", "target_branch"]
            }),
        ),
        tool(
            "update_merge_request",
            "Update an existing merge request, identified either by its IID or by its source branch",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID (either this or source_branch is required)"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Source branch name, used to look up the merge request when merge_request_iid is omitted"
                    },
                    "title": {
                        "type": "string",
                        "description": "Update merge request title"
                    },
                    "description": {
                        "type": "string",
                        "description": "Update merge request description (max 1,048,576 characters)"
                    },
                    "state_event": {
                        "type": "string",
                        "enum": ["close", "reopen"],
                        "description": "Change the state (close or reopen the MR)"
                    },
                    "target_branch": {
                        "type": "string",
                        "description": "Change the target branch"
                    },
                    "assignee_id": {
                        "type": "number",
                        "description": "Assign a user to the merge request (use 0 to unassign)"
                    },
                    "assignee_ids": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Assign multiple users to the merge request"
                    },
                    "reviewer_ids": {
                        "type": "array",
                        "items": { "type": "number" },
                        "description": "Set reviewers for the merge request"
                    },
                    "milestone_id": {
                        "type": "number",
                        "description": "Assign a milestone (use 0 to remove)"
                    },
                    "labels": {
                        "type": "string",
                        "description": "Update labels (comma-separated)"
                    },
                    "remove_source_branch": {
                        "type": "boolean",
                        "description": "Flag to remove source branch after merging"
                    },
                    "squash": {
                        "type": "boolean",
                        "description": "Toggle squash commits on merge"
                    },
                    "allow_collaboration": {
                        "type": "boolean",
                        "description": "Allow commits from members who can merge"
                    },
                    "merge_when_pipeline_succeeds": {
                        "type": "boolean",
                        "description": "Set MR to merge when pipeline succeeds"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "get_merge_request_diffs",
            "Get the changes (diffs) of a merge request, identified either by its IID or by its source branch",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID (either this or source_branch is required)"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Source branch name, used to look up the merge request when merge_request_iid is omitted"
                    },
                    "view": {
                        "type": "string",
                        "enum": ["inline", "parallel"],
                        "description": "Diff view type"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "list_merge_request_diffs",
            "List merge request diffs with pagination, identified either by IID or by source branch",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID (either this or source_branch is required)"
                    },
                    "source_branch": {
                        "type": "string",
                        "description": "Source branch name, used to look up the merge request when merge_request_iid is omitted"
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number for pagination"
                    },
                    "per_page": {
                        "type": "number",
                        "description": "Number of results per page (max 100)",
                        "maximum": 100
                    },
                    "unidiff": {
                        "type": "boolean",
                        "description": "Present diffs in the unified diff format"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "get_branch_diffs",
            "Compare two branches, tags, or commits in a project",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "from": {
                        "type": "string",
                        "description": "The commit SHA or branch name to compare from"
                    },
                    "to": {
                        "type": "string",
                        "description": "The commit SHA or branch name to compare to"
                    },
                    "straight": {
                        "type": "boolean",
                        "description": "Comparison method: true for direct comparison, false to compare using merge base"
                    }
                },
                "required": ["project_id", "from", "to"]
            }),
        ),
        tool(
            "list_mr_notes",
            "List all notes (comments) on a merge request",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "sort": {
                        "type": "string",
                        "enum": ["asc", "desc"],
                        "description": "Sort order (asc or desc)",
                        "default": "desc"
                    },
                    "order_by": {
                        "type": "string",
                        "enum": ["created_at", "updated_at"],
                        "description": "Field to order by",
                        "default": "created_at"
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number for pagination"
                    },
                    "per_page": {
                        "type": "number",
                        "description": "Number of results per page (max 100)",
                        "maximum": 100,
                        "default": 20
                    }
                },
                "required": ["project_id", "merge_request_iid"]
            }),
        ),
        tool(
            "list_mr_discussions",
            "List all discussions (threaded comments including inline code comments) on a merge request",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "unresolved_only": {
                        "type": "boolean",
                        "description": "Fetch every page and return only discussions with unresolved resolvable notes",
                        "default": false
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number for pagination (ignored when unresolved_only is set)"
                    },
                    "per_page": {
                        "type": "number",
                        "description": "Number of results per page (max 100)",
                        "maximum": 100,
                        "default": 20
                    }
                },
                "required": ["project_id", "merge_request_iid"]
            }),
        ),
        tool(
            "create_mr_note",
            "Add a new top-level comment to a merge request",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "body": {
                        "type": "string",
                        "description": "The content of the comment (supports Markdown)"
                    }
                },
                "required": ["project_id", "merge_request_iid", "body"]
            }),
        ),
        tool(
            "create_mr_discussion",
            "Create a new discussion on a merge request. Can be a general discussion or an inline comment on the diff",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "body": {
                        "type": "string",
                        "description": "The content of the discussion (supports Markdown)"
                    },
                    "position": {
                        "type": "object",
                        "description": "Position for inline/diff comments. Required fields: base_sha, start_sha, head_sha, old_path, new_path. Use new_line for additions, old_line for deletions, both for context lines.",
                        "properties": {
                            "base_sha": {
                                "type": "string",
                                "description": "Base commit SHA (merge request target branch HEAD)"
                            },
                            "start_sha": {
                                "type": "string",
                                "description": "SHA of the commit when the MR was created (typically same as base_sha)"
                            },
                            "head_sha": {
                                "type": "string",
                                "description": "HEAD commit SHA of the merge request source branch"
                            },
                            "old_path": {
                                "type": "string",
                                "description": "File path before the change (use same as new_path for new files)"
                            },
                            "new_path": {
                                "type": "string",
                                "description": "File path after the change"
                            },
                            "position_type": {
                                "type": "string",
                                "enum": ["text"],
                                "description": "Type of position (text for code comments)",
                                "default": "text"
                            },
                            "old_line": {
                                "type": "number",
                                "description": "Line number in old version (for deleted lines or context)"
                            },
                            "new_line": {
                                "type": "number",
                                "description": "Line number in new version (for added lines or context)"
                            }
                        },
                        "required": ["base_sha", "start_sha", "head_sha", "old_path", "new_path"]
                    }
                },
                "required": ["project_id", "merge_request_iid", "body"]
            }),
        ),
        tool(
            "reply_to_mr_discussion",
            "Reply to an existing discussion thread on a merge request",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion to reply to"
                    },
                    "body": {
                        "type": "string",
                        "description": "The content of the reply (supports Markdown)"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id", "body"]
            }),
        ),
        tool(
            "resolve_mr_discussion",
            "Mark a discussion on a merge request as resolved",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion to resolve"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id"]
            }),
        ),
        tool(
            "unresolve_mr_discussion",
            "Mark a discussion on a merge request as unresolved",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion to unresolve"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id"]
            }),
        ),
        tool(
            "update_mr_discussion_note",
            "Modify an existing note in a merge request discussion",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion containing the note"
                    },
                    "note_id": {
                        "type": "number",
                        "description": "The ID of the note to update"
                    },
                    "body": {
                        "type": "string",
                        "description": "The new content of the note (supports Markdown)"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id", "note_id", "body"]
            }),
        ),
        tool(
            "create_mr_discussion_note",
            "Add a new note to an existing merge request discussion",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion to add the note to"
                    },
                    "body": {
                        "type": "string",
                        "description": "The content of the note (supports Markdown)"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id", "body"]
            }),
        ),
        tool(
            "delete_mr_discussion_note",
            "Delete a note from a merge request discussion",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    },
                    "discussion_id": {
                        "type": "string",
                        "description": "The ID of the discussion containing the note"
                    },
                    "note_id": {
                        "type": "number",
                        "description": "The ID of the note to delete"
                    }
                },
                "required": ["project_id", "merge_request_iid", "discussion_id", "note_id"]
            }),
        ),
        tool(
            "mark_mr_as_draft",
            "Mark a merge request as draft (work in progress, not ready for review)",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    }
                },
                "required": ["project_id", "merge_request_iid"]
            }),
        ),
        tool(
            "mark_mr_as_ready",
            "Mark a merge request as ready (remove draft status, ready for review)",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "merge_request_iid": {
                        "type": "number",
                        "description": "Merge request internal ID"
                    }
                },
                "required": ["project_id", "merge_request_iid"]
            }),
        ),
        tool(
            "list_mr_templates",
            "List available merge request description templates in a project",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    }
                },
                "required": ["project_id"]
            }),
        ),
        tool(
            "get_mr_template",
            "Get a specific merge request description template by name",
            json!({
                "type": "object",
                "properties": {
                    "project_id": {
                        "type": "string",
                        "description": "Project ID or path"
                    },
                    "name": {
                        "type": "string",
                        "description": "Template name (without .md extension)"
                    }
                },
                "required": ["project_id", "name"]
            }),
        ),
    ]
}
